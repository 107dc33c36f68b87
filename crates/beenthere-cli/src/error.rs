//! Errors surfaced to the user by the command-line front end.

use std::path::PathBuf;

use beenthere_core::{LoadError, StatusError};

/// Anything that stops a subcommand.  Printed to stderr by `main`.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// A file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A file could not be written.
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The country file is not a usable GeoJSON `FeatureCollection`.
    #[error("{}: {source}", path.display())]
    Countries { path: PathBuf, source: LoadError },

    /// The status snapshot could not be parsed or rendered.
    #[error("{}: {source}", path.display())]
    Statuses { path: PathBuf, source: StatusError },

    /// `--config-json` did not parse as an export config.
    #[error("error parsing --config-json: {0}")]
    Config(#[source] serde_json::Error),

    /// Command output could not be rendered as JSON.
    #[error("cannot render JSON output: {0}")]
    Output(#[source] serde_json::Error),

    /// The code given to `mark` is not in the country file.
    #[error("unknown country code {0:?} (try `beenthere search`)")]
    UnknownCountry(String),
}
