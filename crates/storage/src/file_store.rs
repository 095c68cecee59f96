//! Directory-backed store: one pretty-printed `<account>.json` per account.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use biblio_core::LoanRecord;

use crate::error::StorageError;
use crate::key::validate_account_key;
use crate::traits::{RecordStore, parse_records};

#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the list stored under `account_key`.
    pub fn path_for(&self, account_key: &str) -> Result<PathBuf, StorageError> {
        validate_account_key(account_key)?;
        Ok(self.dir.join(format!("{account_key}.json")))
    }
}

#[async_trait]
impl RecordStore for FileStore {
    async fn load(&self, account_key: &str) -> Result<Vec<LoanRecord>, StorageError> {
        let path = self.path_for(account_key)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(account = account_key, path = %path.display(), "no stored loan history, starting fresh");
                return Ok(Vec::new());
            },
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        let records = parse_records(&bytes, &path.display().to_string())?;
        tracing::info!(account = account_key, count = records.len(), "loaded stored loans");
        Ok(records)
    }

    async fn save(&self, account_key: &str, records: &[LoanRecord]) -> Result<(), StorageError> {
        let path = self.path_for(account_key)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| StorageError::Io { path: self.dir.clone(), source })?;

        let json = serde_json::to_vec_pretty(records)?;
        // Write next to the target and rename so readers never see a half-written list.
        let tmp = self.dir.join(format!(".{account_key}.json.tmp"));
        tokio::fs::write(&tmp, &json)
            .await
            .map_err(|source| StorageError::Io { path: tmp.clone(), source })?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|source| StorageError::Io { path: path.clone(), source })?;

        tracing::info!(account = account_key, count = records.len(), path = %path.display(), "saved loans");
        Ok(())
    }
}
