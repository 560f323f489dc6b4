//! Error types for loading datasets, configuration and saved comparisons.
//!
//! The scoring, validation and cost functions are total and never return
//! these; only I/O boundaries do.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid {kind} data: {reason}")]
    InvalidData { kind: &'static str, reason: String },

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Unknown usage preset: {0}")]
    UnknownPreset(String),

    #[error("Storage error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
