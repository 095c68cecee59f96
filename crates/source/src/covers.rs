//! Local cache of cover images.
//!
//! Remote cover URLs in a snapshot are downloaded into the covers directory
//! and the record's reference is rewritten to the relative path the display
//! client serves them from. A failed download only costs that record its
//! cover.

use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use biblio_core::LoanRecord;
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::error::SourceError;

/// Prefix of rewritten cover references, relative to the published data.
const PUBLIC_PREFIX: &str = "covers";
const KNOWN_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Hex digits of the title/URL digest kept in cover file names.
const HASH_LEN: usize = 12;

static NON_SLUG_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

#[derive(Debug, Clone)]
pub struct CoverCache {
    client: reqwest::Client,
    dir: PathBuf,
}

impl CoverCache {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, dir: dir.into() })
    }

    /// Download remote covers and point each record at its local copy.
    ///
    /// Records whose cover cannot be fetched lose their `cover_ref`; local
    /// references are left untouched.
    pub async fn localize(&self, records: Vec<LoanRecord>) -> Vec<LoanRecord> {
        let mut localized = Vec::with_capacity(records.len());
        for mut record in records {
            if let Some(url) = record.cover_ref.take() {
                record.cover_ref = if is_remote(&url) {
                    match self.fetch_cover(&record.title, &url).await {
                        Ok(local) => Some(local),
                        Err(e) => {
                            tracing::warn!(title = %record.title, error = %e, "cover download failed, dropping cover");
                            None
                        },
                    }
                } else {
                    Some(url)
                };
            }
            localized.push(record);
        }
        localized
    }

    async fn fetch_cover(&self, title: &str, url: &str) -> Result<String, SourceError> {
        let file_name = cover_file_name(title, url);
        let path = self.dir.join(&file_name);
        let public = format!("{PUBLIC_PREFIX}/{file_name}");

        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(public);
        }

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::HttpStatus { code: status.as_u16(), url: url.to_owned() });
        }
        let bytes = response.bytes().await?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| SourceError::Io { path: self.dir.clone(), source })?;
        tokio::fs::write(&path, &bytes).await.map_err(|source| SourceError::Io { path: path.clone(), source })?;

        tracing::debug!(%title, path = %path.display(), "cached cover");
        Ok(public)
    }
}

fn is_remote(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

/// Lowercase ASCII slug of a title, `cover` when nothing usable remains.
fn slug(title: &str) -> String {
    let lowered = biblio_core::normalize_title(title);
    let dashed = NON_SLUG_CHARS.replace_all(&lowered, "-");
    let trimmed = dashed.trim_matches('-');
    if trimmed.is_empty() { "cover".to_owned() } else { trimmed.to_owned() }
}

/// `<slug>-<hash>.<ext>`. The hash covers the normalized title and the URL,
/// so titles sharing a slug still get distinct files.
fn cover_file_name(title: &str, url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(biblio_core::normalize_title(title).as_bytes());
    hasher.update(b"\n");
    hasher.update(url.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("{}-{}.{}", slug(title), &digest[..HASH_LEN], extension_of(url))
}

/// Image extension taken from the URL path, `jpg` when unknown.
fn extension_of(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let ext = path.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    KNOWN_EXTENSIONS
        .iter()
        .find(|known| ext.as_deref() == Some(**known))
        .copied()
        .unwrap_or("jpg")
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn slug_and_extension() {
        assert_eq!(slug("  Don Quijote: Parte 1 "), "don-quijote-parte-1");
        assert_eq!(slug("!!!"), "cover");
        assert_eq!(extension_of("https://x/img/portada.PNG?w=200"), "png");
        assert_eq!(extension_of("https://x/cover?id=3"), "jpg");
    }

    #[tokio::test]
    async fn downloads_remote_covers_and_degrades_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1_u8, 2, 3]))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/missing.jpg"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let cache = CoverCache::new(dir.path().join("covers")).unwrap();
        let now = Utc::now();
        let ok_url = format!("{}/ok.png", server.uri());
        let records = vec![
            LoanRecord::builder("Don Quijote", now).cover_ref(ok_url.clone()).build(),
            LoanRecord::builder("Lost", now).cover_ref(format!("{}/missing.jpg", server.uri())).build(),
            LoanRecord::builder("Local", now).cover_ref("covers/local.jpg").build(),
            LoanRecord::builder("None", now).build(),
        ];

        let localized = cache.localize(records).await;

        let file_name = cover_file_name("Don Quijote", &ok_url);
        assert!(file_name.starts_with("don-quijote-") && file_name.ends_with(".png"));
        assert_eq!(localized[0].cover_ref, Some(format!("covers/{file_name}")));
        assert_eq!(std::fs::read(dir.path().join("covers").join(&file_name)).unwrap(), vec![1_u8, 2, 3]);
        assert!(localized[1].cover_ref.is_none());
        assert_eq!(localized[2].cover_ref.as_deref(), Some("covers/local.jpg"));
        assert!(localized[3].cover_ref.is_none());
    }

    #[tokio::test]
    async fn titles_sharing_a_slug_get_their_own_files() {
        let server = MockServer::start().await;
        for (route, body) in [("/a.jpg", b"a"), ("/b.jpg", b"b"), ("/c.jpg", b"c"), ("/d.jpg", b"d")] {
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
                .mount(&server)
                .await;
        }

        let dir = tempfile::tempdir().unwrap();
        let cache = CoverCache::new(dir.path()).unwrap();
        let now = Utc::now();
        let titles = ["El Principito", "¿El Principito?", "ノルウェイの森", "海辺のカフカ"];
        let records = titles
            .iter()
            .zip(["a", "b", "c", "d"])
            .map(|(title, file)| {
                LoanRecord::builder(*title, now).cover_ref(format!("{}/{file}.jpg", server.uri())).build()
            })
            .collect();

        let localized = cache.localize(records).await;

        let refs: std::collections::HashSet<_> = localized.iter().filter_map(|r| r.cover_ref.clone()).collect();
        assert_eq!(refs.len(), 4);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 4);
        let principito = localized[1].cover_ref.as_deref().unwrap().trim_start_matches("covers/");
        assert_eq!(std::fs::read(dir.path().join(principito)).unwrap(), b"b");
    }

    #[tokio::test]
    async fn cached_cover_is_not_downloaded_again() {
        let server = MockServer::start().await;
        Mock::given(method("GET")).respond_with(ResponseTemplate::new(500)).expect(0).mount(&server).await;

        let url = format!("{}/atlas.jpg", server.uri());
        let file_name = cover_file_name("Atlas", &url);
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(&file_name), b"cached").unwrap();
        let cache = CoverCache::new(dir.path()).unwrap();
        let records = vec![LoanRecord::builder("Atlas", Utc::now()).cover_ref(url).build()];

        let localized = cache.localize(records).await;

        assert_eq!(localized[0].cover_ref, Some(format!("covers/{file_name}")));
    }
}
