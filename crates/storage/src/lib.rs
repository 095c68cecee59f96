//! Storage layer for biblio-sync
//!
//! Persists each account's loan history as one JSON list, either as a file
//! in a local directory or as a blob in an HTTP object container.

mod backend;
mod blob_store;
pub mod error;
mod file_store;
mod key;
#[cfg(test)]
mod tests;
pub mod traits;

pub use backend::StorageBackend;
pub use blob_store::BlobStore;
pub use error::StorageError;
pub use file_store::FileStore;
pub use key::validate_account_key;
pub use traits::RecordStore;
