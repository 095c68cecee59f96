//! Core types for biblio-sync
//!
//! Loan records, the reconciliation engine that folds a fresh snapshot into
//! persisted history, and the configuration shared by every other crate.

mod config;
mod constants;
mod due_date;
mod env_config;
mod error;
mod loan;

pub use config::*;
pub use constants::*;
pub use due_date::parse_due_date;
pub use env_config::*;
pub use error::*;
pub use loan::*;
