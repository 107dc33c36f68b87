//! Export configuration.

use serde::{Deserialize, Serialize};

use beenthere_core::PolygonSelectorKind;

use crate::kml::KmlMetadata;

/// Settings for one KML export.
///
/// Every field has a default, so a partial JSON object (or `{}`)
/// deserializes into a usable config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// `<name>` of the KML `<Document>`.
    pub document_name: String,

    /// `<description>` of the KML `<Document>`.
    pub document_description: String,

    /// How a multi-polygon country is reduced to one polygon.
    pub polygon_selector: PolygonSelectorKind,

    /// File name the document is saved or uploaded under.  An existing
    /// file with this name is expected to be overwritten.
    pub filename: String,
}

impl ExportConfig {
    /// Default document name.
    pub const DEFAULT_DOCUMENT_NAME: &'static str = "MyCountries";
    /// Default document description.
    pub const DEFAULT_DOCUMENT_DESCRIPTION: &'static str =
        "Countries I've visited and want to visit";
    /// Default output file name.
    pub const DEFAULT_FILENAME: &'static str = "MyCountries.kml";

    /// Borrow the document header fields as [`KmlMetadata`].
    #[must_use]
    pub fn metadata(&self) -> KmlMetadata<'_> {
        KmlMetadata {
            name: &self.document_name,
            description: &self.document_description,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            document_name: Self::DEFAULT_DOCUMENT_NAME.to_owned(),
            document_description: Self::DEFAULT_DOCUMENT_DESCRIPTION.to_owned(),
            polygon_selector: PolygonSelectorKind::default(),
            filename: Self::DEFAULT_FILENAME.to_owned(),
        }
    }
}
