//! Geometry extraction: pick the one ring-set a country is exported as.
//!
//! A KML placemark here carries a single polygon, so a country made of
//! several landmasses has to be reduced to one of them.  This module
//! defines the [`PolygonSelector`] trait for pluggable selection
//! strategies and the [`PolygonSelectorKind`] enum for runtime choice.
//!
//! The default strategy, [`VertexCount`](PolygonSelectorKind::VertexCount),
//! approximates "largest landmass" by the number of points on each outer
//! ring.  It misjudges countries whose main island is drawn coarsely
//! next to a finely drawn small one; [`Area`](PolygonSelectorKind::Area)
//! is available for callers that prefer planar area instead.

use geo::{Area, LineString, Polygon};
use serde::{Deserialize, Serialize};

use crate::types::{Geometry, Ring, RingSet};

/// Selects how the dominant polygon of a multi-polygon is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolygonSelectorKind {
    /// The polygon whose outer ring has the most positions.
    ///
    /// Ties go to the polygon that appears first.
    #[default]
    VertexCount,

    /// The polygon whose outer ring encloses the largest planar area,
    /// measured in square degrees with no projection.
    ///
    /// Ties go to the polygon that appears first.
    Area,
}

/// Trait for dominant-polygon selection strategies.
pub trait PolygonSelector {
    /// Choose one polygon out of `polygons`, or `None` if it is empty.
    fn select<'a>(&self, polygons: &'a [RingSet]) -> Option<&'a RingSet>;
}

impl PolygonSelector for PolygonSelectorKind {
    #[allow(clippy::cast_precision_loss)]
    fn select<'a>(&self, polygons: &'a [RingSet]) -> Option<&'a RingSet> {
        match *self {
            Self::VertexCount => first_max_by(polygons, |set| set.outer_len() as f64),
            Self::Area => first_max_by(polygons, |set| set.outer().map_or(0.0, outer_area)),
        }
    }
}

/// Return the ring-set to export for `geometry`.
///
/// - A polygon is returned as is.
/// - A multi-polygon is reduced to one polygon by `selector`.
/// - Unsupported geometry, an empty multi-polygon, or a chosen polygon
///   whose outer ring is missing or empty yields `None`; the caller
///   should skip the country.
#[must_use]
pub fn dominant_ring_set<'a>(
    geometry: &'a Geometry,
    selector: &impl PolygonSelector,
) -> Option<&'a RingSet> {
    let candidate = match geometry {
        Geometry::Polygon(set) => Some(set),
        Geometry::MultiPolygon(polygons) => selector.select(polygons),
        Geometry::Unsupported => None,
    };
    candidate.filter(|set| set.outer_len() > 0)
}

/// The first element with the strictly greatest key.
///
/// `NaN` keys never win against an earlier element.
fn first_max_by<T>(items: &[T], key: impl Fn(&T) -> f64) -> Option<&T> {
    let mut iter = items.iter();
    let first = iter.next()?;
    let mut best = (first, key(first));
    for item in iter {
        let k = key(item);
        if k > best.1 {
            best = (item, k);
        }
    }
    Some(best.0)
}

/// Unsigned planar area of a ring, in square degrees.
fn outer_area(ring: &Ring) -> f64 {
    let exterior: LineString<f64> = ring
        .positions()
        .iter()
        .map(|p| (p.lng, p.lat))
        .collect::<Vec<_>>()
        .into();
    Polygon::new(exterior, Vec::new()).unsigned_area()
}
