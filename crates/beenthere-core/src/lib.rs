//! beenthere-core: Pure country and travel-status model (sans-IO).
//!
//! Holds everything the KML export and the command-line front end share:
//! country records loaded from GeoJSON, the per-country status map, the
//! dominant-polygon extraction used when exporting, plus statistics and
//! search over the loaded countries.
//!
//! This crate has **no I/O dependencies** -- it parses in-memory strings
//! and returns structured data. Reading and writing files lives in
//! `beenthere-cli`.

pub mod countries;
pub mod extract;
pub mod search;
pub mod stats;
pub mod status;
pub mod types;

pub use countries::{display_name, find_country, parse_countries};
pub use extract::{PolygonSelector, PolygonSelectorKind, dominant_ring_set};
pub use search::search;
pub use stats::{MarkedCountry, TravelStats, compute_stats};
pub use status::StatusMap;
pub use types::{
    CountryCode, CountryRecord, Geometry, LoadError, Position, Ring, RingSet, Status, StatusError,
};
