use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the hotac library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A catalog file exists but could not be read.
    #[error("failed to read catalog file {path}: {source}")]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON catalog file did not match the expected schema.
    #[error("invalid JSON catalog {path}: {source}")]
    CatalogJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A YAML catalog file did not match the expected schema.
    #[error("invalid YAML catalog {path}: {source}")]
    CatalogYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// None of the accepted file names for a catalog section exist.
    #[error("no {name}.json, {name}.yaml or {name}.yml in {dir}")]
    MissingCatalogFile { dir: PathBuf, name: &'static str },

    #[error("unknown ship: {id}")]
    UnknownShip { id: String },

    #[error("unknown upgrade: {id}")]
    UnknownUpgrade { id: u32 },

    #[error("unknown pilot: {id}")]
    UnknownPilot { id: u32 },

    /// A build history must open with a starting-ship entry.
    #[error("build history has no starting ship entry")]
    MissingStartingShip,

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
