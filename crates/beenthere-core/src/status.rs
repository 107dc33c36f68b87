//! The user's per-country status map and its JSON snapshot format.
//!
//! A [`StatusMap`] holds at most one [`Status`] per country.  Entries
//! keep the order in which they were first inserted: re-tagging a
//! country updates it in place, clearing removes it.  That order is
//! what the KML export walks when it partitions countries into groups.
//!
//! The snapshot is a flat JSON object (`{"FR": "visited", ...}`).  On
//! load, values that are not one of the two recognised tags are
//! dropped with a warning rather than failing the whole snapshot.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::{CountryCode, Status, StatusError};

/// Insertion-ordered mapping from country code to status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusMap {
    entries: Vec<(CountryCode, Status)>,
}

impl StatusMap {
    /// Create an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of marked countries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no country is marked.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The status of `code`, or `None` when unmarked.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<Status> {
        self.position(code).map(|i| self.entries[i].1)
    }

    /// Mark `code` with `status`, replacing any previous status.
    ///
    /// A country that was already marked keeps its position; a new one
    /// is appended.  Returns the previous status.
    pub fn set(&mut self, code: CountryCode, status: Status) -> Option<Status> {
        if let Some(i) = self.position(code.as_str()) {
            Some(std::mem::replace(&mut self.entries[i].1, status))
        } else {
            self.entries.push((code, status));
            None
        }
    }

    /// Unmark `code`.  Returns the status it had.
    pub fn clear(&mut self, code: &str) -> Option<Status> {
        self.position(code).map(|i| self.entries.remove(i).1)
    }

    /// Set or clear in one call: `None` unmarks the country.
    pub fn apply(&mut self, code: CountryCode, status: Option<Status>) -> Option<Status> {
        match status {
            Some(status) => self.set(code, status),
            None => self.clear(code.as_str()),
        }
    }

    /// All entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&CountryCode, Status)> {
        self.entries.iter().map(|(code, status)| (code, *status))
    }

    /// Codes carrying `status`, in insertion order.
    pub fn codes_with(&self, status: Status) -> impl Iterator<Item = &CountryCode> {
        self.entries
            .iter()
            .filter(move |(_, s)| *s == status)
            .map(|(code, _)| code)
    }

    /// Number of countries carrying `status`.
    #[must_use]
    pub fn count(&self, status: Status) -> usize {
        self.codes_with(status).count()
    }

    /// Parse a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StatusError::Json`] if the text is not a JSON object.
    /// Unrecognised values inside a valid object are skipped, not
    /// reported.
    pub fn from_json_str(json: &str) -> Result<Self, StatusError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render the map as a pretty-printed JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StatusError::Json`] if serialization fails.
    pub fn to_json_string(&self) -> Result<String, StatusError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn position(&self, code: &str) -> Option<usize> {
        self.entries.iter().position(|(c, _)| c.as_str() == code)
    }
}

impl FromIterator<(CountryCode, Status)> for StatusMap {
    /// Later duplicates overwrite earlier ones in place.
    fn from_iter<I: IntoIterator<Item = (CountryCode, Status)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (code, status) in iter {
            map.set(code, status);
        }
        map
    }
}

impl Serialize for StatusMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (code, status) in &self.entries {
            map.serialize_entry(code, status)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StatusMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(StatusMapVisitor)
    }
}

struct StatusMapVisitor;

impl<'de> Visitor<'de> for StatusMapVisitor {
    type Value = StatusMap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of country codes to \"visited\" or \"wishlist\"")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = StatusMap::new();
        while let Some((code, value)) = access.next_entry::<String, serde_json::Value>()? {
            match value.as_str().map(str::parse::<Status>) {
                Some(Ok(status)) => {
                    map.set(CountryCode::new(code), status);
                }
                _ => {
                    // A cleared entry may have been written as null.
                    if !value.is_null() {
                        tracing::warn!(%code, %value, "ignoring unrecognised status");
                    }
                }
            }
        }
        Ok(map)
    }
}
