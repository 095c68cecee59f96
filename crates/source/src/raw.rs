//! Raw loan rows as emitted by the automation command.

use biblio_core::{LoanRecord, parse_due_date};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One row of the loan list exactly as scraped.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLoan {
    #[serde(default)]
    pub title: Option<String>,
    /// Free text such as `"Devolver antes de: 12/02/2026"`.
    #[serde(default)]
    pub due_text: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub coleccion: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Convert scraped rows into records observed at `observed_at`.
///
/// Rows without a title are dropped. Blank optional values become `None` and
/// an unreadable due date leaves the record without one.
#[must_use]
pub fn records_from_raw(rows: Vec<RawLoan>, observed_at: DateTime<Utc>) -> Vec<LoanRecord> {
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(title) = clean(row.title) else {
            tracing::warn!("dropping scraped loan without a title");
            continue;
        };

        let due_date = row.due_text.as_deref().and_then(parse_due_date);
        if due_date.is_none() && row.due_text.as_deref().is_some_and(|t| !t.trim().is_empty()) {
            tracing::warn!(%title, due_text = ?row.due_text, "unreadable due date");
        }

        records.push(
            LoanRecord::builder(title, observed_at)
                .maybe_author(clean(row.author))
                .maybe_collection(clean(row.coleccion))
                .maybe_cover_ref(clean(row.image_url))
                .maybe_due_date(due_date)
                .build(),
        );
    }
    records
}

fn clean(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}
