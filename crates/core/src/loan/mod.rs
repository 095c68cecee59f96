//! Loan records and the reconciliation of snapshots into persisted history.

mod builder;
pub mod dates;
mod reconcile;

pub use builder::*;
pub use reconcile::*;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One book the account has borrowed at some point.
///
/// Field names on the wire follow the persisted layout read by the display
/// client (`Title`, `Author`, `Coleccion`, `ImageUrl`, `DueDate`, `FirstSeen`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoanRecord {
    /// Title as scraped; displayed verbatim.
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    /// Series or collection name.
    #[serde(rename = "Coleccion", default)]
    pub collection: Option<String>,
    /// Local path or URL of the cover image.
    #[serde(rename = "ImageUrl", default)]
    pub cover_ref: Option<String>,
    /// `None` when the book is not currently due (or never was known to be).
    #[serde(default, with = "dates::optional_date")]
    pub due_date: Option<NaiveDate>,
    /// When the title was first observed. Immutable once set.
    #[serde(with = "dates::timestamp")]
    pub first_seen: DateTime<Utc>,
}

impl LoanRecord {
    /// Identity key of this record, see [`normalize_title`].
    #[must_use]
    pub fn normalized_title(&self) -> String {
        normalize_title(&self.title)
    }
}

/// Identity key for a title: surrounding whitespace trimmed, lowercased.
///
/// Two records denote the same book iff their normalized titles are equal.
#[must_use]
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}
