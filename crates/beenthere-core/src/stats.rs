//! Aggregate travel statistics.

use serde::Serialize;

use crate::countries::display_name;
use crate::status::StatusMap;
use crate::types::{CountryRecord, Status};

/// World size assumed when no country data is loaded.
pub const DEFAULT_WORLD_SIZE: usize = 195;

/// A marked country as shown in statistics listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkedCountry {
    /// Country code.
    pub code: String,
    /// Display name (the code when the country is not in the loaded set).
    pub name: String,
}

/// Counts and listings derived from a [`StatusMap`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TravelStats {
    /// Visited countries, in marking order.
    pub visited: Vec<MarkedCountry>,
    /// Wishlist countries, in marking order.
    pub wishlist: Vec<MarkedCountry>,
    /// Denominator for [`visited_percent`](Self::visited_percent).
    pub total_countries: usize,
}

impl TravelStats {
    /// Number of visited countries.
    #[must_use]
    pub const fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Number of wishlist countries.
    #[must_use]
    pub const fn wishlist_count(&self) -> usize {
        self.wishlist.len()
    }

    /// Share of the world visited, as a percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn visited_percent(&self) -> f64 {
        if self.total_countries == 0 {
            return 0.0;
        }
        self.visited.len() as f64 / self.total_countries as f64 * 100.0
    }
}

/// Compute statistics for `statuses` against the loaded `countries`.
///
/// The world size is the number of loaded countries, or
/// [`DEFAULT_WORLD_SIZE`] when none are loaded.  Marked codes that are not
/// in `countries` still count; they are listed under their code.
#[must_use]
pub fn compute_stats(statuses: &StatusMap, countries: &[CountryRecord]) -> TravelStats {
    let listing = |status: Status| -> Vec<MarkedCountry> {
        statuses
            .codes_with(status)
            .map(|code| MarkedCountry {
                code: code.to_string(),
                name: display_name(countries, code.as_str()).to_owned(),
            })
            .collect()
    };

    let total_countries = if countries.is_empty() {
        DEFAULT_WORLD_SIZE
    } else {
        countries.len()
    };

    TravelStats {
        visited: listing(Status::Visited),
        wishlist: listing(Status::Wishlist),
        total_countries,
    }
}
