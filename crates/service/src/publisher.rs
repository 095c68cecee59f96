//! Publishing of reconciled lists for the display client.

use std::path::PathBuf;

use biblio_core::LoanRecord;

use crate::ServiceError;

/// Writes `<dir>/<account>.json` for the display client. Without a directory
/// the stored list is the only published copy and this is a no-op.
#[derive(Debug, Clone, Default)]
pub struct Publisher {
    dir: Option<PathBuf>,
}

impl Publisher {
    #[must_use]
    pub const fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    /// Returns the written path, if any.
    pub async fn publish(
        &self,
        account_key: &str,
        records: &[LoanRecord],
    ) -> Result<Option<PathBuf>, ServiceError> {
        let Some(dir) = &self.dir else {
            return Ok(None);
        };
        let path = dir.join(format!("{account_key}.json"));
        let json = serde_json::to_vec_pretty(records)?;

        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| ServiceError::Publish { path: dir.clone(), source })?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|source| ServiceError::Publish { path: path.clone(), source })?;

        tracing::info!(account = account_key, count = records.len(), path = %path.display(), "published loans");
        Ok(Some(path))
    }
}

/// Plain-text listing of a reconciled list, one block per book.
#[must_use]
pub fn render_listing(records: &[LoanRecord]) -> String {
    let mut out = String::from("=== Book List ===\n");
    if records.is_empty() {
        out.push_str("  (no books)\n");
        return out;
    }
    for record in records {
        let due = record.due_date.map_or_else(|| "N/A".to_owned(), |d| d.format("%d/%m/%Y").to_string());
        out.push_str(&format!("  {}\n", record.title));
        if let Some(author) = &record.author {
            out.push_str(&format!("    Author: {author}\n"));
        }
        out.push_str(&format!("    Due: {due}\n"));
        out.push_str(&format!("    First seen: {}\n", record.first_seen.format("%d/%m/%Y")));
    }
    out
}
