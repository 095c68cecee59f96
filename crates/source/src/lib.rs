//! Snapshot sources for biblio-sync
//!
//! Produce the list of books an account currently has on loan, stamped with
//! the observation time. Browser automation itself runs in an external
//! command; this crate runs it, validates its output and turns it into
//! [`biblio_core::LoanRecord`]s.

mod command;
mod covers;
pub mod error;
mod file;
mod raw;
pub mod traits;

pub use command::{CommandSource, LOGIN_FAILED_EXIT_CODE};
pub use covers::CoverCache;
pub use error::SourceError;
pub use file::FileSource;
pub use raw::{RawLoan, records_from_raw};
pub use traits::SnapshotSource;
