//! Typed error enum for the service layer.
//!
//! Unifies source, storage and publishing failures so the binary can report
//! which stage of an account's run broke.

use std::path::PathBuf;

use biblio_source::SourceError;
use biblio_storage::StorageError;
use thiserror::Error;

/// Service-layer error unifying source, storage and publish failures.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The snapshot could not be produced; nothing was merged.
    #[error("source: {0}")]
    Source(#[from] SourceError),

    /// Writing the reconciled history failed.
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// Writing the display copy failed.
    #[error("publish to {}: {source}", .path.display())]
    Publish {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Requested account key is not configured.
    #[error("unknown account: {0}")]
    UnknownAccount(String),
}

impl ServiceError {
    /// Whether this error is likely transient (worth retrying on the next run).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Storage(e) => e.is_transient(),
            Self::Source(SourceError::Timeout { .. }) => true,
            _ => false,
        }
    }

    /// Whether the library rejected the account's credentials.
    pub fn is_login_failure(&self) -> bool {
        matches!(self, Self::Source(SourceError::LoginFailed { .. }))
    }
}
