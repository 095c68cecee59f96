use std::path::Path;

use anyhow::{Context, Result};
use biblio_core::{LoanRecord, Reconciliation, reconcile_with_report};

async fn read_records(path: &Path) -> Result<Vec<LoanRecord>> {
    let bytes = tokio::fs::read(path).await.with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
}

pub(crate) async fn run(prior: &Path, snapshot: &Path) -> Result<()> {
    let prior = read_records(prior).await?;
    let snapshot = read_records(snapshot).await?;

    let Reconciliation { records, report } = reconcile_with_report(prior, snapshot);
    tracing::info!(
        added = report.added,
        updated = report.updated,
        duplicates_skipped = report.duplicates_skipped,
        backfills = report.backfills.len(),
        total = records.len(),
        "merged"
    );

    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
