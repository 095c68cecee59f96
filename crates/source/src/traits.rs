use async_trait::async_trait;
use biblio_core::{AccountConfig, LoanRecord};

use crate::error::SourceError;

/// Something that can tell which books an account currently has on loan.
///
/// Every returned record carries `first_seen` set to the observation time.
/// An error means the snapshot must not be merged at all.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self, account: &AccountConfig) -> Result<Vec<LoanRecord>, SourceError>;
}
