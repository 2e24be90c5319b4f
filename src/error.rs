//! Error types for workout-log.

use std::path::PathBuf;

use thiserror::Error;

use crate::parser::ParseError;

#[derive(Error, Debug)]
pub enum Error {
    // === Input Errors ===
    /// Form input was rejected. The collection is unchanged.
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Delete was requested without choosing a workout.
    #[error("please select a workout to delete")]
    NoSelection,

    /// Delete was requested for a position past the end of the collection.
    #[error("no workout at position {} (there are {len})", .index.saturating_add(1))]
    OutOfRange { index: usize, len: usize },

    // === Storage Errors ===
    /// The data file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    StorageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The data file contains a record that does not parse.
    #[error("malformed record in {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// The data file could not be written.
    #[error("failed to write {path}: {source}")]
    StorageWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Configuration Errors ===
    #[error("failed to read configuration {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}
