//! File access for the country data and the status snapshot.
//!
//! The snapshot is the only state that persists between runs.  A missing
//! snapshot file means nothing has been marked yet.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use beenthere_core::{CountryRecord, StatusMap, parse_countries};

use crate::error::CliError;

/// Read and parse the GeoJSON country file.
pub fn load_countries(path: &Path) -> Result<Vec<CountryRecord>, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let countries = parse_countries(&text).map_err(|source| CliError::Countries {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), countries = countries.len(), "loaded countries");
    Ok(countries)
}

/// Like [`load_countries`], but a missing file yields an empty set.
pub fn load_countries_or_empty(path: &Path) -> Result<Vec<CountryRecord>, CliError> {
    if path.exists() {
        load_countries(path)
    } else {
        tracing::warn!(path = %path.display(), "country file not found; continuing without it");
        Ok(Vec::new())
    }
}

/// Read the status snapshot.  A missing or blank file is an empty map.
pub fn load_statuses(path: &Path) -> Result<StatusMap, CliError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no status snapshot yet");
            return Ok(StatusMap::new());
        }
        Err(source) => {
            return Err(CliError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if text.trim().is_empty() {
        return Ok(StatusMap::new());
    }

    StatusMap::from_json_str(&text).map_err(|source| CliError::Statuses {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the status snapshot, replacing the previous one.
pub fn save_statuses(path: &Path, statuses: &StatusMap) -> Result<(), CliError> {
    let mut json = statuses
        .to_json_string()
        .map_err(|source| CliError::Statuses {
            path: path.to_path_buf(),
            source,
        })?;
    json.push('\n');
    fs::write(path, json).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), entries = statuses.len(), "saved status snapshot");
    Ok(())
}
