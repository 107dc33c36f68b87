//! Country search by name or code.

use crate::types::CountryRecord;

/// Upper bound on the number of matches returned.
pub const MAX_RESULTS: usize = 10;

/// Countries whose name or code contains `query`, ignoring case.
///
/// Results keep the order of `countries` and are capped at
/// [`MAX_RESULTS`].  A blank query matches nothing.
#[must_use]
pub fn search<'a>(countries: &'a [CountryRecord], query: &str) -> Vec<&'a CountryRecord> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    countries
        .iter()
        .filter(|c| {
            c.name.to_lowercase().contains(&query)
                || c.code.as_str().to_lowercase().contains(&query)
        })
        .take(MAX_RESULTS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CountryCode, Geometry};

    fn country(code: &str, name: &str) -> CountryRecord {
        CountryRecord {
            code: CountryCode::new(code),
            name: name.to_owned(),
            geometry: Geometry::Unsupported,
        }
    }

    fn codes<'a>(found: &[&'a CountryRecord]) -> Vec<&'a str> {
        found.iter().map(|c| c.code.as_str()).collect()
    }

    #[test]
    fn matches_name_case_insensitively() {
        let countries = vec![
            country("FR", "France"),
            country("IE", "Ireland"),
            country("FI", "Finland"),
        ];
        assert_eq!(codes(&search(&countries, "LAND")), ["IE", "FI"]);
    }

    #[test]
    fn matches_code() {
        let countries = vec![country("FR", "France"), country("PE", "Peru")];
        assert_eq!(codes(&search(&countries, "pe")), ["PE"]);
    }

    #[test]
    fn matches_accented_names() {
        let countries = vec![country("CI", "Côte d'Ivoire")];
        assert_eq!(codes(&search(&countries, "CÔTE")), ["CI"]);
    }

    #[test]
    fn blank_query_matches_nothing() {
        let countries = vec![country("FR", "France")];
        assert!(search(&countries, "   ").is_empty());
    }

    #[test]
    fn results_are_capped() {
        let countries: Vec<_> = (0..25)
            .map(|i| country(&format!("A{i}"), &format!("Atlantis {i}")))
            .collect();
        let found = search(&countries, "atlantis");
        assert_eq!(found.len(), MAX_RESULTS);
        assert_eq!(found[0].code.as_str(), "A0");
    }
}
