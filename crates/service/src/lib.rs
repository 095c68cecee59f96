//! Service layer for biblio-sync
//!
//! Runs the per-account pipeline: snapshot source, reconciliation against the
//! stored history, store write, publish.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]

mod error;
mod publisher;
mod sync_service;
#[cfg(test)]
mod sync_service_tests;

pub use error::ServiceError;
pub use publisher::{Publisher, render_listing};
pub use sync_service::{AccountOutcome, SyncService, SyncSummary};
