//! Pipeline tests with in-memory source and store.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use biblio_core::{AccountConfig, LoanRecord};
use biblio_source::{SnapshotSource, SourceError};
use biblio_storage::{RecordStore, StorageError};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::{Publisher, ServiceError, SyncService};

struct FakeSource {
    snapshots: HashMap<String, Vec<LoanRecord>>,
}

impl FakeSource {
    fn with(key: &str, records: Vec<LoanRecord>) -> Self {
        Self { snapshots: HashMap::from([(key.to_owned(), records)]) }
    }
}

#[async_trait]
impl SnapshotSource for FakeSource {
    async fn fetch(&self, account: &AccountConfig) -> Result<Vec<LoanRecord>, SourceError> {
        self.snapshots
            .get(&account.key)
            .cloned()
            .ok_or_else(|| SourceError::LoginFailed { account: account.key.clone() })
    }
}

#[derive(Default)]
struct MemoryStore {
    lists: Mutex<HashMap<String, Vec<LoanRecord>>>,
    fail_load: bool,
    fail_save: bool,
    saves: AtomicUsize,
}

impl MemoryStore {
    fn seeded(key: &str, records: Vec<LoanRecord>) -> Self {
        let store = Self::default();
        store.lists.lock().unwrap().insert(key.to_owned(), records);
        store
    }

    fn get(&self, key: &str) -> Option<Vec<LoanRecord>> {
        self.lists.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn load(&self, account_key: &str) -> Result<Vec<LoanRecord>, StorageError> {
        if self.fail_load {
            return Err(StorageError::HttpStatus { code: 500, path: account_key.to_owned(), body: String::new() });
        }
        Ok(self.get(account_key).unwrap_or_default())
    }

    async fn save(&self, account_key: &str, records: &[LoanRecord]) -> Result<(), StorageError> {
        if self.fail_save {
            return Err(StorageError::HttpStatus { code: 403, path: account_key.to_owned(), body: String::new() });
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.lists.lock().unwrap().insert(account_key.to_owned(), records.to_vec());
        Ok(())
    }
}

fn account(key: &str) -> AccountConfig {
    AccountConfig { key: key.to_owned(), username: "reader".to_owned(), password: "secret".to_owned() }
}

fn ts(month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, month, day, 0, 0, 0).unwrap()
}

fn due(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, month, day).unwrap()
}

#[tokio::test]
async fn first_run_stores_snapshot() {
    let snapshot = vec![LoanRecord::builder("Don Quijote", ts(1, 1)).due_date(due(2, 12)).build()];
    let service = SyncService::new(FakeSource::with("books", snapshot.clone()), MemoryStore::default(), Publisher::default());

    let outcome = service.sync_account(&account("books")).await.unwrap();

    assert_eq!(outcome.scraped, 1);
    assert_eq!(outcome.report.added, 1);
    assert_eq!(service.store().get("books").unwrap(), snapshot);
}

#[tokio::test]
async fn later_run_merges_into_history() {
    let prior = vec![
        LoanRecord::builder("Don Quijote", ts(1, 1)).due_date(due(2, 12)).author("Cervantes").build(),
        LoanRecord::builder("Returned Book", ts(1, 2)).due_date(due(1, 15)).build(),
    ];
    let snapshot =
        vec![LoanRecord::builder("don quijote", ts(2, 20)).due_date(due(2, 26)).author("X").collection("Clasicos").build()];
    let service = SyncService::new(
        FakeSource::with("books", snapshot),
        MemoryStore::seeded("books", prior.clone()),
        Publisher::default(),
    );

    let outcome = service.sync_account(&account("books")).await.unwrap();

    let stored = service.store().get("books").unwrap();
    assert_eq!(stored, outcome.records);
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].due_date, Some(due(2, 26)));
    assert_eq!(stored[0].author.as_deref(), Some("Cervantes"));
    assert_eq!(stored[0].collection.as_deref(), Some("Clasicos"));
    assert_eq!(stored[0].first_seen, ts(1, 1));
    assert_eq!(stored[1], prior[1]);
}

#[tokio::test]
async fn source_failure_leaves_store_untouched() {
    let prior = vec![LoanRecord::builder("Kept", ts(1, 1)).build()];
    let service = SyncService::new(
        FakeSource::with("other", Vec::new()),
        MemoryStore::seeded("books", prior.clone()),
        Publisher::default(),
    );

    let err = service.sync_account(&account("books")).await.unwrap_err();

    assert!(err.is_login_failure());
    assert_eq!(service.store().saves.load(Ordering::SeqCst), 0);
    assert_eq!(service.store().get("books").unwrap(), prior);
}

#[tokio::test]
async fn unreadable_history_fails_open_to_empty() {
    let snapshot = vec![LoanRecord::builder("Fresh", ts(2, 1)).build()];
    let store = MemoryStore { fail_load: true, ..MemoryStore::default() };
    let service = SyncService::new(FakeSource::with("books", snapshot.clone()), store, Publisher::default());

    let outcome = service.sync_account(&account("books")).await.unwrap();

    assert_eq!(outcome.records, snapshot);
    assert_eq!(service.store().get("books").unwrap(), snapshot);
}

#[tokio::test]
async fn failed_write_is_fatal_and_nothing_is_published() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryStore { fail_save: true, ..MemoryStore::default() };
    let service = SyncService::new(
        FakeSource::with("books", vec![LoanRecord::builder("Fresh", ts(2, 1)).build()]),
        store,
        Publisher::new(Some(dir.path().to_path_buf())),
    );

    let err = service.sync_account(&account("books")).await.unwrap_err();

    assert!(matches!(err, ServiceError::Storage(StorageError::HttpStatus { code: 403, .. })));
    assert!(!dir.path().join("books.json").exists());
}

#[tokio::test]
async fn successful_run_publishes_display_copy() {
    let dir = tempfile::tempdir().unwrap();
    let service = SyncService::new(
        FakeSource::with("books", vec![LoanRecord::builder("Fresh", ts(2, 1)).build()]),
        MemoryStore::default(),
        Publisher::new(Some(dir.path().to_path_buf())),
    );

    let outcome = service.sync_account(&account("books")).await.unwrap();

    assert_eq!(outcome.published, Some(dir.path().join("books.json")));
    let published: Vec<LoanRecord> =
        serde_json::from_slice(&std::fs::read(dir.path().join("books.json")).unwrap()).unwrap();
    assert_eq!(published, outcome.records);
}

#[tokio::test]
async fn one_failing_account_does_not_stop_the_next() {
    let service = SyncService::new(
        FakeSource::with("books-2", vec![LoanRecord::builder("Second Card", ts(2, 1)).build()]),
        MemoryStore::default(),
        Publisher::default(),
    );

    let summary = service.sync_all(&[account("books"), account("books-2")]).await;

    assert!(!summary.is_success());
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].0, "books");
    assert_eq!(summary.succeeded.len(), 1);
    assert_eq!(summary.succeeded[0].account, "books-2");
    assert!(service.store().get("books").is_none());
}

#[tokio::test]
async fn downloaded_cover_fills_missing_cover_but_never_replaces_one() {
    let server = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::method("GET"))
        .respond_with(wiremock::ResponseTemplate::new(200).set_body_bytes(vec![0xFF_u8, 0xD8, 0xFF]))
        .mount(&server)
        .await;

    let covers_dir = tempfile::tempdir().unwrap();
    let prior = vec![
        LoanRecord::builder("Don Quijote", ts(1, 1)).build(),
        LoanRecord::builder("Atlas", ts(1, 2)).cover_ref("covers/atlas-kept.jpg").build(),
    ];
    let snapshot = vec![
        LoanRecord::builder("Don Quijote", ts(2, 1)).cover_ref(format!("{}/quijote.jpg", server.uri())).build(),
        LoanRecord::builder("Atlas", ts(2, 1)).cover_ref(format!("{}/atlas.jpg", server.uri())).build(),
    ];
    let service = SyncService::new(
        FakeSource::with("books", snapshot),
        MemoryStore::seeded("books", prior),
        Publisher::default(),
    )
    .with_covers(biblio_source::CoverCache::new(covers_dir.path()).unwrap());

    service.sync_account(&account("books")).await.unwrap();

    let stored = service.store().get("books").unwrap();
    let quijote = stored[0].cover_ref.as_deref().unwrap();
    assert!(quijote.starts_with("covers/don-quijote-"), "{quijote}");
    let file_name = quijote.trim_start_matches("covers/");
    assert_eq!(std::fs::read(covers_dir.path().join(file_name)).unwrap(), vec![0xFF_u8, 0xD8, 0xFF]);
    assert_eq!(stored[1].cover_ref.as_deref(), Some("covers/atlas-kept.jpg"));
}
