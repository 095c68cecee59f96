use std::path::PathBuf;

use biblio_core::{AccountConfig, LoanRecord, ReconcileReport, Reconciliation, reconcile_with_report};
use biblio_source::{CoverCache, SnapshotSource};
use biblio_storage::RecordStore;

use crate::{Publisher, ServiceError};

/// Result of one account's successful run.
#[derive(Debug, Clone)]
pub struct AccountOutcome {
    pub account: String,
    /// Books in the fresh snapshot.
    pub scraped: usize,
    /// Reconciled list as saved.
    pub records: Vec<LoanRecord>,
    pub report: ReconcileReport,
    pub published: Option<PathBuf>,
}

/// Result of running every configured account.
#[derive(Debug, Default)]
pub struct SyncSummary {
    pub succeeded: Vec<AccountOutcome>,
    pub failed: Vec<(String, ServiceError)>,
}

impl SyncSummary {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// `source → reconcile(stored, snapshot) → store → publish`, one account at a time.
pub struct SyncService<S, R> {
    source: S,
    store: R,
    publisher: Publisher,
    covers: Option<CoverCache>,
}

impl<S: SnapshotSource, R: RecordStore> SyncService<S, R> {
    #[must_use]
    pub fn new(source: S, store: R, publisher: Publisher) -> Self {
        Self { source, store, publisher, covers: None }
    }

    /// Download remote covers of each snapshot into `covers` before merging.
    #[must_use]
    pub fn with_covers(mut self, covers: CoverCache) -> Self {
        self.covers = Some(covers);
        self
    }

    #[must_use]
    pub const fn store(&self) -> &R {
        &self.store
    }

    /// Run the pipeline for one account.
    ///
    /// A source failure aborts before anything is read or written. A failed
    /// read of the stored list is treated as empty history; a failed write is
    /// returned.
    pub async fn sync_account(&self, account: &AccountConfig) -> Result<AccountOutcome, ServiceError> {
        let snapshot = self.source.fetch(account).await?;
        let scraped = snapshot.len();
        let snapshot = match &self.covers {
            Some(covers) => covers.localize(snapshot).await,
            None => snapshot,
        };

        let prior = self.load_prior(&account.key).await;
        let Reconciliation { records, report } = reconcile_with_report(prior, snapshot);

        self.store.save(&account.key, &records).await?;
        let published = self.publisher.publish(&account.key, &records).await?;

        tracing::info!(
            account = %account.key,
            scraped,
            added = report.added,
            updated = report.updated,
            total = records.len(),
            "sync complete"
        );
        Ok(AccountOutcome { account: account.key.clone(), scraped, records, report, published })
    }

    /// Run every account in order. One account failing does not stop the others.
    pub async fn sync_all(&self, accounts: &[AccountConfig]) -> SyncSummary {
        let mut summary = SyncSummary::default();
        for account in accounts {
            match self.sync_account(account).await {
                Ok(outcome) => summary.succeeded.push(outcome),
                Err(e) => {
                    tracing::error!(account = %account.key, error = %e, "sync failed");
                    summary.failed.push((account.key.clone(), e));
                },
            }
        }
        summary
    }

    async fn load_prior(&self, account_key: &str) -> Vec<LoanRecord> {
        match self.store.load(account_key).await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    account = account_key,
                    error = %e,
                    "failed to load stored loans, continuing with empty history"
                );
                Vec::new()
            },
        }
    }
}
