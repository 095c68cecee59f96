//! Storage trait abstraction.

use async_trait::async_trait;
use biblio_core::LoanRecord;

use crate::error::StorageError;

/// Whole-list persistence of one account's loan history.
///
/// Writes replace the stored list (last write wins). No coordination between
/// writers is attempted; each account is synced by a single pipeline run.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Load the stored list. No stored state is an empty list, not an error.
    async fn load(&self, account_key: &str) -> Result<Vec<LoanRecord>, StorageError>;

    /// Replace the stored list.
    async fn save(&self, account_key: &str, records: &[LoanRecord]) -> Result<(), StorageError>;
}

/// Decode a stored list. Blank content or a JSON `null` reads as no history.
pub(crate) fn parse_records(bytes: &[u8], context: &str) -> Result<Vec<LoanRecord>, StorageError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    let records: Option<Vec<LoanRecord>> =
        serde_json::from_slice(bytes).map_err(|e| StorageError::DataCorruption {
            context: format!("stored loan list {context}"),
            source: Box::new(e),
        })?;
    Ok(records.unwrap_or_default())
}
