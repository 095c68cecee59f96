//! Snapshot source backed by an external browser-automation command.
//!
//! The command receives the account's credentials through the environment
//! (`LIBRARY_USERNAME`, `LIBRARY_PASSWORD`, `LIBRARY_ACCOUNT`) and prints a
//! JSON array of [`crate::RawLoan`] rows on stdout.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use biblio_core::{AccountConfig, LoanRecord};
use chrono::Utc;

use crate::error::SourceError;
use crate::raw::{RawLoan, records_from_raw};
use crate::traits::SnapshotSource;

/// Exit status the automation command uses to report rejected credentials.
pub const LOGIN_FAILED_EXIT_CODE: i32 = 3;

const MAX_STDERR_LEN: usize = 500;

#[derive(Debug, Clone)]
pub struct CommandSource {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandSource {
    /// `command` is the program followed by its arguments.
    ///
    /// # Errors
    /// Returns [`SourceError::NotConfigured`] when `command` is empty.
    pub fn new(command: &[String], timeout: Duration) -> Result<Self, SourceError> {
        let (program, args) = command.split_first().ok_or(SourceError::NotConfigured)?;
        Ok(Self { program: program.clone(), args: args.to_vec(), timeout })
    }
}

#[async_trait]
impl SnapshotSource for CommandSource {
    async fn fetch(&self, account: &AccountConfig) -> Result<Vec<LoanRecord>, SourceError> {
        tracing::info!(account = %account.key, program = %self.program, "running scraper");

        let child = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .env("LIBRARY_USERNAME", &account.username)
            .env("LIBRARY_PASSWORD", &account.password)
            .env("LIBRARY_ACCOUNT", &account.key)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| SourceError::Spawn { program: self.program.clone(), source })?;

        // On timeout the child is dropped, which kills it.
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| SourceError::Timeout { secs: self.timeout.as_secs() })?
            .map_err(|source| SourceError::Spawn { program: self.program.clone(), source })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            tracing::debug!(account = %account.key, stderr = %truncate(&stderr, MAX_STDERR_LEN), "scraper stderr");
        }

        if !output.status.success() {
            if output.status.code() == Some(LOGIN_FAILED_EXIT_CODE) {
                return Err(SourceError::LoginFailed { account: account.key.clone() });
            }
            return Err(SourceError::CommandFailed {
                code: output.status.code(),
                stderr: truncate(stderr.trim(), MAX_STDERR_LEN).to_owned(),
            });
        }

        let rows: Vec<RawLoan> = serde_json::from_slice(&output.stdout).map_err(|source| {
            SourceError::InvalidOutput { context: format!("{} stdout", self.program), source }
        })?;
        let records = records_from_raw(rows, Utc::now());
        tracing::info!(account = %account.key, count = records.len(), "scraped loans");
        Ok(records)
    }
}

/// Cut `s` to at most `max` bytes on a char boundary.
fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
