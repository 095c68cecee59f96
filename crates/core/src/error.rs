use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while assembling [`crate::AppConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "missing required configuration: {missing}. Set LibraryUsername/LibraryPassword in \
         appsettings.json or the LIBRARY_USERNAME/LIBRARY_PASSWORD environment variables"
    )]
    MissingCredentials { missing: String },

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
