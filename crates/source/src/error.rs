//! Typed error enum for snapshot sources.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from producing a snapshot. Any of these aborts the account's run.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no scraper command configured (set BIBLIO_SCRAPER_CMD or ScraperCommand)")]
    NotConfigured,

    #[error("failed to run scraper {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("scraper timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("login failed for account {account}")]
    LoginFailed { account: String },

    #[error("scraper exited with {}: {stderr}", .code.map_or_else(|| "a signal".to_owned(), |c| format!("code {c}")))]
    CommandFailed { code: Option<i32>, stderr: String },

    #[error("invalid snapshot in {context}: {source}")]
    InvalidOutput {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("io error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("HTTP status {code} for {url}")]
    HttpStatus { code: u16, url: String },
}
