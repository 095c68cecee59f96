use std::path::PathBuf;

use async_trait::async_trait;
use biblio_core::{AccountConfig, LoanRecord};
use chrono::Utc;

use crate::error::SourceError;
use crate::raw::{RawLoan, records_from_raw};
use crate::traits::SnapshotSource;

/// Reads a previously captured scraper output instead of running the scraper.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotSource for FileSource {
    async fn fetch(&self, account: &AccountConfig) -> Result<Vec<LoanRecord>, SourceError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| SourceError::Io { path: self.path.clone(), source })?;
        let rows: Vec<RawLoan> = serde_json::from_slice(&bytes).map_err(|source| SourceError::InvalidOutput {
            context: self.path.display().to_string(),
            source,
        })?;
        let records = records_from_raw(rows, Utc::now());
        tracing::info!(account = %account.key, count = records.len(), path = %self.path.display(), "read snapshot file");
        Ok(records)
    }
}
