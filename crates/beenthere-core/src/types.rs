//! Shared types for BeenThere country data and travel status.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Longitude (degrees east of the prime meridian).
    pub lng: f64,
    /// Latitude (degrees north of the equator).
    pub lat: f64,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

/// An ordered, implicitly closed sequence of positions bounding a region.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Ring(Vec<Position>);

impl Ring {
    /// Create a new ring from a vector of positions.
    #[must_use]
    pub const fn new(positions: Vec<Position>) -> Self {
        Self(positions)
    }

    /// Returns `true` if the ring has no positions.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of positions in the ring.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns a slice of all positions.
    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.0
    }
}

impl FromIterator<Position> for Ring {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One polygon: an outer ring followed by zero or more hole rings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RingSet(Vec<Ring>);

impl RingSet {
    /// Create a new ring-set. The first ring is the outer boundary.
    #[must_use]
    pub const fn new(rings: Vec<Ring>) -> Self {
        Self(rings)
    }

    /// All rings, outer boundary first.
    #[must_use]
    pub fn rings(&self) -> &[Ring] {
        &self.0
    }

    /// The outer boundary, if the ring-set has any rings at all.
    #[must_use]
    pub fn outer(&self) -> Option<&Ring> {
        self.0.first()
    }

    /// Interior rings (holes).
    #[must_use]
    pub fn holes(&self) -> &[Ring] {
        self.0.get(1..).unwrap_or_default()
    }

    /// Number of positions in the outer ring (0 when there is none).
    #[must_use]
    pub fn outer_len(&self) -> usize {
        self.outer().map_or(0, Ring::len)
    }
}

/// The boundary geometry of a country.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Geometry {
    /// A single polygon, possibly with holes.
    Polygon(RingSet),
    /// Disjoint polygons, e.g. a mainland plus islands.
    MultiPolygon(Vec<RingSet>),
    /// Geometry that was absent or of a kind other than the two above.
    #[default]
    Unsupported,
}

/// An ISO 3166 alpha-2 or alpha-3 country code.
///
/// Codes are compared exactly as given; callers that accept user input
/// are expected to normalise case before constructing one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryCode(String);

impl CountryCode {
    /// Wrap a code string.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CountryCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One country: its code, display name and boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    /// Primary key.
    pub code: CountryCode,
    /// Human-readable name.
    pub name: String,
    /// Boundary geometry. Immutable once loaded.
    pub geometry: Geometry,
}

/// The classification a user attaches to a country.
///
/// A country carries at most one status at a time; "unmarked" is the
/// absence of an entry in a [`StatusMap`](crate::StatusMap).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The user has been there.
    Visited,
    /// The user wants to go there.
    Wishlist,
}

impl Status {
    /// Every status, in export order.
    pub const ALL: [Self; 2] = [Self::Visited, Self::Wishlist];

    /// The tag used in snapshots and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Visited => "visited",
            Self::Wishlist => "wishlist",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "visited" => Ok(Self::Visited),
            "wishlist" => Ok(Self::Wishlist),
            other => Err(StatusError::UnknownStatus(other.to_owned())),
        }
    }
}

/// Errors that can occur while loading country data.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The input text was empty or whitespace only.
    #[error("empty input")]
    EmptyInput,

    /// The input was not valid GeoJSON.
    #[error("invalid GeoJSON: {0}")]
    GeoJson(#[from] Box<geojson::Error>),

    /// The GeoJSON parsed, but its top level is not a `FeatureCollection`.
    #[error("expected a GeoJSON FeatureCollection")]
    NotFeatureCollection,
}

/// Errors that can occur while parsing status tags or snapshots.
#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    /// A tag other than `visited` or `wishlist`.
    #[error("unknown status {0:?} (expected \"visited\" or \"wishlist\")")]
    UnknownStatus(String),

    /// The snapshot text was not a JSON object.
    #[error("invalid status snapshot: {0}")]
    Json(#[from] serde_json::Error),
}
