use std::path::{Path, PathBuf};

use anyhow::Result;
use biblio_core::{AccountConfig, AppConfig};
use biblio_service::{Publisher, ServiceError, SyncService};
use biblio_source::{CommandSource, CoverCache, FileSource, SnapshotSource, SourceError};
use biblio_storage::StorageBackend;

pub(crate) async fn run(config_path: Option<&Path>, snapshot: Option<PathBuf>, only: Option<&str>) -> Result<()> {
    let config = AppConfig::load(config_path)?;

    let accounts: Vec<AccountConfig> = match only {
        Some(key) => {
            let account = config.account(key).ok_or_else(|| ServiceError::UnknownAccount(key.to_owned()))?;
            vec![account.clone()]
        },
        None => config.accounts.clone(),
    };

    // A captured snapshot belongs to a single library card.
    if snapshot.is_some() && accounts.len() > 1 {
        anyhow::bail!(
            "--snapshot holds one card's loans but {} accounts are configured; pick one with --account",
            accounts.len()
        );
    }

    match snapshot {
        Some(path) => sync_with(FileSource::new(path), &config, &accounts).await,
        None => {
            let command = config.scraper_command.as_deref().ok_or(SourceError::NotConfigured)?;
            let source = CommandSource::new(command, config.source_timeout)?;
            sync_with(source, &config, &accounts).await
        },
    }
}

async fn sync_with<S: SnapshotSource>(source: S, config: &AppConfig, accounts: &[AccountConfig]) -> Result<()> {
    let store = StorageBackend::from_location(&config.storage_location, config.storage_token.clone())?;
    tracing::info!(store = %store.describe(), accounts = accounts.len(), "starting sync");

    let mut service = SyncService::new(source, store, Publisher::new(config.publish_dir.clone()));
    if let Some(dir) = &config.covers_dir {
        service = service.with_covers(CoverCache::new(dir)?);
    }

    let summary = service.sync_all(accounts).await;
    for outcome in &summary.succeeded {
        println!(
            "{}: {} scraped, {} added, {} updated, {} total",
            outcome.account,
            outcome.scraped,
            outcome.report.added,
            outcome.report.updated,
            outcome.records.len()
        );
    }

    if !summary.is_success() {
        for (account, err) in &summary.failed {
            if err.is_login_failure() {
                eprintln!("{account}: login rejected, check the account's credentials");
            } else if err.is_transient() {
                eprintln!("{account}: {err} (likely transient, retry on the next run)");
            } else {
                eprintln!("{account}: {err}");
            }
        }
        anyhow::bail!("{} of {} account(s) failed to sync", summary.failed.len(), accounts.len());
    }
    Ok(())
}
