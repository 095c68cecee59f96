//! HTTP blob container store.
//!
//! `GET`/`PUT` of `<container>/<account>.json`. Works against Azure Blob
//! Storage container URLs carrying a SAS query string, and against any plain
//! object endpoint accepting bearer-authenticated PUTs.

use std::time::Duration;

use async_trait::async_trait;
use biblio_core::LoanRecord;
use reqwest::{RequestBuilder, StatusCode, Url};

use crate::error::StorageError;
use crate::key::validate_account_key;
use crate::traits::{RecordStore, parse_records};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct BlobStore {
    client: reqwest::Client,
    container: Url,
    token: Option<String>,
}

impl std::fmt::Debug for BlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The query string may hold a SAS signature.
        f.debug_struct("BlobStore")
            .field("container", &redacted(&self.container))
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

impl BlobStore {
    /// Creates a store for the container at `container_url`.
    ///
    /// # Errors
    /// Returns an error if the URL cannot hold path segments or the HTTP
    /// client cannot be built.
    pub fn new(container_url: &str, token: Option<String>) -> Result<Self, StorageError> {
        let container = Url::parse(container_url).map_err(|e| StorageError::InvalidLocation {
            location: container_url.to_owned(),
            reason: e.to_string(),
        })?;
        if container.cannot_be_a_base() {
            return Err(StorageError::InvalidLocation {
                location: container_url.to_owned(),
                reason: "URL cannot hold a blob path".to_owned(),
            });
        }
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, container, token })
    }

    /// URL of the blob holding `account_key`'s list. Keeps the container's query string.
    pub fn blob_url(&self, account_key: &str) -> Result<Url, StorageError> {
        validate_account_key(account_key)?;
        let mut url = self.container.clone();
        url.path_segments_mut()
            .map_err(|()| StorageError::InvalidLocation {
                location: redacted(&self.container),
                reason: "URL cannot hold a blob path".to_owned(),
            })?
            .pop_if_empty()
            .push(&format!("{account_key}.json"));
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl RecordStore for BlobStore {
    async fn load(&self, account_key: &str) -> Result<Vec<LoanRecord>, StorageError> {
        let url = self.blob_url(account_key)?;
        let path = url.path().to_owned();
        let response = self.authorize(self.client.get(url)).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::info!(account = account_key, %path, "no stored loan history, starting fresh");
            return Ok(Vec::new());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "could not read error body".to_owned());
            return Err(StorageError::HttpStatus { code: status.as_u16(), path, body });
        }

        let bytes = response.bytes().await?;
        let records = parse_records(&bytes, &path)?;
        tracing::info!(account = account_key, count = records.len(), "downloaded stored loans");
        Ok(records)
    }

    async fn save(&self, account_key: &str, records: &[LoanRecord]) -> Result<(), StorageError> {
        let url = self.blob_url(account_key)?;
        let path = url.path().to_owned();
        let json = serde_json::to_vec_pretty(records)?;

        let response = self
            .authorize(self.client.put(url))
            .header("x-ms-blob-type", "BlockBlob")
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(json)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "could not read error body".to_owned());
            return Err(StorageError::HttpStatus { code: status.as_u16(), path, body });
        }

        tracing::info!(account = account_key, count = records.len(), %path, "uploaded loans");
        Ok(())
    }
}

/// Container URL without its query string.
fn redacted(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}
