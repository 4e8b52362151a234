//! Error types for the packaging pipeline

use std::path::PathBuf;

use thiserror::Error;

use crate::packaging::RunId;

#[derive(Error, Debug)]
pub enum Error {
    /// Source does not resolve to an existing directory; raised before any side effect.
    #[error("path {} does not refer to a valid directory", .path.display())]
    InvalidSource { path: PathBuf },

    /// An argument could not be turned into a usable path.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// The PAK builder failed while processing the mod.
    #[error("failed to process mod {mod_name}: {source}")]
    Processing {
        mod_name: String,
        #[source]
        source: unilarian::Error,
    },

    /// The PAK builder reported success but left no file behind.
    #[error("Failed to pak mod file: {} was not created", .path.display())]
    MissingOutput { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The zip builder failed.
    #[error("archive error: {0}")]
    Archive(#[source] unilarian::Error),

    #[error("manifest serialization error: {0}")]
    Manifest(#[from] serde_json::Error),

    /// A run identifier was recorded twice in the same registry.
    #[error("run {0} is already recorded")]
    DuplicateRun(RunId),

    #[error("invalid config file {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown compression method '{0}' (valid: lz4, zlib, none)")]
    UnknownCompression(String),
}

pub type Result<T> = std::result::Result<T, Error>;
