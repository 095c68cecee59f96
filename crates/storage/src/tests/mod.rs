//! Test utilities and module declarations for storage tests.

use chrono::{NaiveDate, TimeZone, Utc};
use biblio_core::LoanRecord;
use tempfile::TempDir;

use crate::FileStore;

#[allow(clippy::unwrap_used, reason = "test code")]
pub fn create_test_store() -> (FileStore, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let store = FileStore::new(temp_dir.path().join("books"));
    (store, temp_dir)
}

#[allow(clippy::unwrap_used, reason = "test code")]
pub fn create_test_records() -> Vec<LoanRecord> {
    vec![
        LoanRecord::builder("Don Quijote", Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap())
            .author("Cervantes")
            .collection("Clasicos")
            .cover_ref("covers/don-quijote.jpg")
            .due_date(NaiveDate::from_ymd_opt(2026, 2, 12).unwrap())
            .build(),
        LoanRecord::builder("La Ovejita Va Al Cole", Utc.with_ymd_and_hms(2026, 1, 8, 17, 45, 3).unwrap())
            .build(),
    ]
}


#[test]
fn backend_from_location_picks_kind() {
    use crate::StorageBackend;

    let file = StorageBackend::from_location("/var/lib/biblio", None).unwrap();
    assert!(matches!(file, StorageBackend::File(_)));

    let blob =
        StorageBackend::from_location("https://acct.blob.core.windows.net/books?sig=abc", None).unwrap();
    assert!(matches!(blob, StorageBackend::Blob(_)));
    assert!(!format!("{blob:?}").contains("sig=abc"));

    assert!(StorageBackend::from_location("  ", None).is_err());
}
