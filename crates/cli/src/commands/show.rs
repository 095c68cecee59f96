use std::path::Path;

use anyhow::Result;
use biblio_core::AppConfig;
use biblio_service::render_listing;
use biblio_storage::{RecordStore, StorageBackend};

pub(crate) async fn run(config_path: Option<&Path>, account: &str) -> Result<()> {
    let config = AppConfig::load(config_path)?;
    let store = StorageBackend::from_location(&config.storage_location, config.storage_token.clone())?;

    let records = store.load(account).await?;
    print!("{}", render_listing(&records));
    Ok(())
}
