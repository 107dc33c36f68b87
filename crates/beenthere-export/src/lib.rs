//! beenthere-export: Pure format serializers (sans-IO)
//!
//! Converts the travel-status map and country boundaries into a KML
//! overlay for Google My Maps.

pub mod config;
pub mod kml;

use beenthere_core::{CountryRecord, StatusMap};

pub use config::ExportConfig;
pub use kml::{
    ExportSummary, GroupSummary, KML_MIME_TYPE, KmlDocument, KmlMetadata, assemble_kml,
    encode_ring, to_kml, xml_escape,
};

/// Build the KML export described by `config`.
///
/// Shorthand for [`assemble_kml`] with the metadata and polygon selector
/// taken from `config`.
///
/// # Examples
///
/// ```
/// use beenthere_core::{CountryCode, StatusMap, Status};
/// use beenthere_export::{ExportConfig, export_kml};
///
/// let mut statuses = StatusMap::new();
/// statuses.set(CountryCode::new("FR"), Status::Visited);
/// let doc = export_kml(&statuses, &[], &ExportConfig::default());
/// assert_eq!(doc.summary.visited.unmatched, 1);
/// assert!(doc.text.contains("<name>MyCountries</name>"));
/// ```
#[must_use]
pub fn export_kml(
    statuses: &StatusMap,
    countries: &[CountryRecord],
    config: &ExportConfig,
) -> KmlDocument {
    let document = assemble_kml(
        statuses,
        countries,
        &config.metadata(),
        &config.polygon_selector,
    );
    tracing::debug!(
        placemarks = document.summary.placemarks(),
        bytes = document.text.len(),
        "assembled KML document"
    );
    document
}
