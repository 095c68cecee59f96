//! Unified storage backend with enum dispatch.

use async_trait::async_trait;
use biblio_core::LoanRecord;

use crate::error::StorageError;
use crate::traits::RecordStore;
use crate::{BlobStore, FileStore};

macro_rules! dispatch {
    ($self:expr, $method:ident ( $($arg:expr),* $(,)? )) => {
        match $self {
            StorageBackend::File(s) => <FileStore as RecordStore>::$method(s, $($arg),*).await,
            StorageBackend::Blob(s) => <BlobStore as RecordStore>::$method(s, $($arg),*).await,
        }
    };
}

#[derive(Clone, Debug)]
pub enum StorageBackend {
    File(FileStore),
    Blob(BlobStore),
}

impl StorageBackend {
    /// `http://` / `https://` locations are blob containers, anything else a directory.
    pub fn from_location(location: &str, token: Option<String>) -> Result<Self, StorageError> {
        let trimmed = location.trim();
        if trimmed.is_empty() {
            return Err(StorageError::InvalidLocation {
                location: location.to_owned(),
                reason: "empty".to_owned(),
            });
        }
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return Ok(Self::Blob(BlobStore::new(trimmed, token)?));
        }
        if token.is_some() {
            tracing::warn!("storage token ignored for a directory store");
        }
        Ok(Self::File(FileStore::new(trimmed)))
    }

    /// Short human-readable description for logs.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::File(s) => format!("directory {}", s.dir().display()),
            Self::Blob(_) => "blob container".to_owned(),
        }
    }
}

#[async_trait]
impl RecordStore for StorageBackend {
    async fn load(&self, account_key: &str) -> Result<Vec<LoanRecord>, StorageError> {
        dispatch!(self, load(account_key))
    }

    async fn save(&self, account_key: &str, records: &[LoanRecord]) -> Result<(), StorageError> {
        dispatch!(self, save(account_key, records))
    }
}
