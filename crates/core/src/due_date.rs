//! Due-date extraction from the loan list's free text.

use chrono::NaiveDate;

const DUE_DATE_FORMAT: &str = "%d/%m/%Y";
const DUE_DATE_LEN: usize = 10;

/// Parse a due date from text like `"Devolver antes de: 12/02/2026"`.
///
/// Takes whatever follows the first `:` (or the whole text when there is no
/// label), keeps the first ten characters and reads them as `dd/mm/yyyy`.
/// Blank or unparsable text yields `None`.
#[must_use]
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let date_part = match raw.split_once(':') {
        Some((_, rest)) if !rest.trim().is_empty() => rest.trim(),
        _ => raw,
    };
    let date_part = match date_part.char_indices().nth(DUE_DATE_LEN) {
        Some((end, _)) => &date_part[..end],
        None => date_part,
    };

    NaiveDate::parse_from_str(date_part, DUE_DATE_FORMAT).ok()
}
