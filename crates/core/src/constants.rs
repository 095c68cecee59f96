//! Shared constants for biblio-sync.

/// Store key of the account configured through `LIBRARY_USERNAME`.
pub const PRIMARY_ACCOUNT_KEY: &str = "books";

/// Store key of the optional account configured through `LIBRARY_USERNAME_2`.
pub const SECONDARY_ACCOUNT_KEY: &str = "books-2";

/// Settings file looked up in the working directory when no `--config` is given.
pub const DEFAULT_SETTINGS_FILE: &str = "appsettings.json";

/// Directory name used under the platform data dir when no storage location is set.
pub const DEFAULT_DATA_DIR_NAME: &str = "biblio-sync";

/// Wall-clock limit for one snapshot source invocation.
pub const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = 180;
