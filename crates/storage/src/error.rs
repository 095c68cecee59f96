//! Typed error enum for the storage layer.
//!
//! Lets the pipeline tell a recoverable read problem from a failed write and
//! a transient HTTP failure from corrupt data.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Storage-layer error with variants covering every expected failure mode.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Account key unusable as a file or blob name.
    #[error("invalid account key {0:?}")]
    InvalidKey(String),

    /// Storage location string could not be turned into a backend.
    #[error("invalid storage location {location:?}: {reason}")]
    InvalidLocation { location: String, reason: String },

    /// Filesystem failure on a specific path.
    #[error("io error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Transport-level HTTP failure (connect, timeout, body read).
    #[error("http request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Blob endpoint answered with a non-success status.
    #[error("http status {code} for {path}: {body}")]
    HttpStatus { code: u16, path: String, body: String },

    /// Stored data could not be deserialized into loan records.
    #[error("data corruption: {context}")]
    DataCorruption {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StorageError {
    /// Whether this error is likely transient (worth retrying).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::HttpRequest(e) => e.is_timeout() || e.is_connect(),
            Self::HttpStatus { code, .. } => matches!(code, 429 | 500 | 502 | 503 | 504),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::DataCorruption {
            context: "JSON serialization/deserialization".to_owned(),
            source: Box::new(err),
        }
    }
}
