//! Country loading from a GeoJSON `FeatureCollection`.
//!
//! Each feature becomes a [`CountryRecord`].  The code comes from the
//! `ISO_A2` property, falling back to `ISO_A3`; features with neither are
//! left out.  The name comes from `NAME`, falling back to the code.
//! Natural Earth marks unassigned codes as `"-99"`, which is treated the
//! same as a missing property.
//!
//! Only `Polygon` and `MultiPolygon` geometries are kept; anything else
//! (including a null geometry) loads as [`Geometry::Unsupported`] so the
//! country can still be marked and counted, it just exports no shape.

use geojson::{Feature, GeoJson};

use crate::types::{CountryCode, CountryRecord, Geometry, LoadError, Position, Ring, RingSet};

/// Display-name property.
pub const NAME_PROPERTY: &str = "NAME";
/// Preferred country-code property (ISO 3166-1 alpha-2).
pub const ISO_A2_PROPERTY: &str = "ISO_A2";
/// Fallback country-code property (ISO 3166-1 alpha-3).
pub const ISO_A3_PROPERTY: &str = "ISO_A3";
/// Natural Earth's placeholder for "no code assigned".
const UNASSIGNED_CODE: &str = "-99";

/// Parse a GeoJSON `FeatureCollection` into country records, preserving
/// feature order.
///
/// # Errors
///
/// Returns [`LoadError::EmptyInput`] if `geojson` is blank,
/// [`LoadError::GeoJson`] if it does not parse, and
/// [`LoadError::NotFeatureCollection`] if the top-level object is a bare
/// geometry or a single feature.
pub fn parse_countries(geojson: &str) -> Result<Vec<CountryRecord>, LoadError> {
    if geojson.trim().is_empty() {
        return Err(LoadError::EmptyInput);
    }

    let parsed: GeoJson = geojson.parse().map_err(Box::new)?;
    let GeoJson::FeatureCollection(collection) = parsed else {
        return Err(LoadError::NotFeatureCollection);
    };

    let total = collection.features.len();
    let countries: Vec<CountryRecord> = collection
        .features
        .iter()
        .filter_map(country_from_feature)
        .collect();

    tracing::debug!(
        features = total,
        countries = countries.len(),
        "loaded country features"
    );
    Ok(countries)
}

/// Look up a country by code.
#[must_use]
pub fn find_country<'a>(countries: &'a [CountryRecord], code: &str) -> Option<&'a CountryRecord> {
    countries.iter().find(|c| c.code.as_str() == code)
}

/// The display name for `code`, or the code itself when no record
/// matches.
#[must_use]
pub fn display_name<'a>(countries: &'a [CountryRecord], code: &'a str) -> &'a str {
    find_country(countries, code).map_or(code, |c| c.name.as_str())
}

fn country_from_feature(feature: &Feature) -> Option<CountryRecord> {
    let Some(code) = code_property(feature, ISO_A2_PROPERTY)
        .or_else(|| code_property(feature, ISO_A3_PROPERTY))
    else {
        tracing::debug!(
            name = ?feature.property(NAME_PROPERTY),
            "feature has no usable country code; excluded"
        );
        return None;
    };

    let name = feature
        .property(NAME_PROPERTY)
        .and_then(serde_json::Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(code)
        .to_owned();

    let geometry = feature
        .geometry
        .as_ref()
        .map_or(Geometry::Unsupported, |g| convert_geometry(&g.value));

    Some(CountryRecord {
        code: CountryCode::new(code),
        name,
        geometry,
    })
}

fn code_property<'a>(feature: &'a Feature, key: &str) -> Option<&'a str> {
    feature
        .property(key)
        .and_then(serde_json::Value::as_str)
        .filter(|s| !s.is_empty() && *s != UNASSIGNED_CODE)
}

fn convert_geometry(value: &geojson::Value) -> Geometry {
    match value {
        geojson::Value::Polygon(rings) => Geometry::Polygon(convert_ring_set(rings)),
        geojson::Value::MultiPolygon(polygons) => {
            Geometry::MultiPolygon(polygons.iter().map(|p| convert_ring_set(p)).collect())
        }
        _ => Geometry::Unsupported,
    }
}

fn convert_ring_set(rings: &[Vec<geojson::Position>]) -> RingSet {
    RingSet::new(rings.iter().map(|r| convert_ring(r)).collect())
}

/// Positions with fewer than two ordinates are dropped; any altitude is
/// ignored.
fn convert_ring(positions: &[geojson::Position]) -> Ring {
    positions
        .iter()
        .filter_map(|p| match p.as_slice() {
            [lng, lat, ..] => Some(Position::new(*lng, *lat)),
            _ => None,
        })
        .collect()
}
