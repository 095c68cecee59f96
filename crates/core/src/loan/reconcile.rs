//! Pure reconciliation of a fresh loan snapshot with persisted history.
//!
//! No I/O happens here. Storage and scraping live in their own crates; this
//! module only decides what the next persisted list looks like.

use std::collections::HashMap;
use std::fmt;

use super::LoanRecord;

/// Optional field adopted from the snapshot because the stored value was absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackfillField {
    Author,
    Collection,
    CoverRef,
}

impl BackfillField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::Collection => "collection",
            Self::CoverRef => "cover_ref",
        }
    }
}

impl fmt::Display for BackfillField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single backfill applied during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backfill {
    /// Title of the stored record that received the value.
    pub title: String,
    pub field: BackfillField,
}

/// What a reconciliation did. Informational only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Snapshot records whose title was not known before.
    pub added: usize,
    /// Snapshot records that updated an already known title.
    pub updated: usize,
    /// Prior records dropped because their title was already present.
    pub duplicates_skipped: usize,
    pub backfills: Vec<Backfill>,
}

/// Reconciled records together with the report describing the merge.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub records: Vec<LoanRecord>,
    pub report: ReconcileReport,
}

/// Merge `snapshot` into `prior` and return the next persisted list.
///
/// See [`reconcile_with_report`] for the rules.
#[must_use]
pub fn reconcile(prior: Vec<LoanRecord>, snapshot: Vec<LoanRecord>) -> Vec<LoanRecord> {
    reconcile_with_report(prior, snapshot).records
}

/// Merge `snapshot` into `prior`, keyed by normalized title.
///
/// # Merge rules
/// - **Prior duplicates**: the first record per title wins, later ones are dropped
/// - **Known title**: `due_date` is overwritten (also with `None`), `first_seen`
///   is kept, and `author` / `collection` / `cover_ref` are only filled when absent
/// - **Unknown title**: the snapshot record is inserted unchanged
/// - **Order**: ascending `first_seen`, ties keep insertion order
#[must_use]
pub fn reconcile_with_report(prior: Vec<LoanRecord>, snapshot: Vec<LoanRecord>) -> Reconciliation {
    let mut report = ReconcileReport::default();
    let capacity = prior.len().saturating_add(snapshot.len());
    let mut records: Vec<LoanRecord> = Vec::with_capacity(capacity);
    let mut slots: HashMap<String, usize> = HashMap::with_capacity(capacity);

    for record in prior {
        let key = record.normalized_title();
        if slots.contains_key(&key) {
            tracing::warn!(title = %record.title, "skipping duplicate title in persisted records");
            report.duplicates_skipped += 1;
            continue;
        }
        slots.insert(key, records.len());
        records.push(record);
    }

    for incoming in snapshot {
        let key = incoming.normalized_title();
        match slots.get(&key).copied().and_then(|slot| records.get_mut(slot)) {
            Some(existing) => {
                for field in apply_update(existing, incoming) {
                    tracing::debug!(title = %existing.title, %field, "backfilled missing field");
                    report.backfills.push(Backfill { title: existing.title.clone(), field });
                }
                report.updated += 1;
            },
            None => {
                tracing::debug!(title = %incoming.title, "new loan");
                slots.insert(key, records.len());
                records.push(incoming);
                report.added += 1;
            },
        }
    }

    records.sort_by_key(|r| r.first_seen);

    tracing::info!(
        added = report.added,
        updated = report.updated,
        backfilled = report.backfills.len(),
        duplicates_skipped = report.duplicates_skipped,
        total = records.len(),
        "reconciled loan snapshot"
    );

    Reconciliation { records, report }
}

/// Fold an incoming observation of a known book into its stored record.
///
/// Returns the optional fields that were backfilled.
fn apply_update(existing: &mut LoanRecord, incoming: LoanRecord) -> Vec<BackfillField> {
    existing.due_date = incoming.due_date;

    let mut filled = Vec::new();
    if backfill(&mut existing.author, incoming.author) {
        filled.push(BackfillField::Author);
    }
    if backfill(&mut existing.collection, incoming.collection) {
        filled.push(BackfillField::Collection);
    }
    if backfill(&mut existing.cover_ref, incoming.cover_ref) {
        filled.push(BackfillField::CoverRef);
    }
    filled
}

/// Adopt `incoming` only when `slot` is empty. Never overwrites.
fn backfill(slot: &mut Option<String>, incoming: Option<String>) -> bool {
    match (slot.as_ref(), incoming) {
        (None, Some(value)) => {
            *slot = Some(value);
            true
        },
        _ => false,
    }
}
