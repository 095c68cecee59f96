//! Startup configuration: optional `appsettings.json` overlaid by environment variables.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::{
    ConfigError, ConfigResult, DEFAULT_DATA_DIR_NAME, DEFAULT_SETTINGS_FILE,
    DEFAULT_SOURCE_TIMEOUT_SECS, PRIMARY_ACCOUNT_KEY, SECONDARY_ACCOUNT_KEY, parse_with_default,
};

/// Credentials of one library account plus the key its history is stored under.
#[derive(Clone, PartialEq, Eq)]
pub struct AccountConfig {
    pub key: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountConfig")
            .field("key", &self.key)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Settings as they appear in the JSON settings file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileSettings {
    pub library_username: Option<String>,
    pub library_password: Option<String>,
    pub library_username2: Option<String>,
    pub library_password2: Option<String>,
    pub storage_location: Option<String>,
    pub storage_token: Option<String>,
    pub scraper_command: Option<String>,
    pub publish_dir: Option<PathBuf>,
    pub covers_dir: Option<PathBuf>,
    pub source_timeout_secs: Option<u64>,
}

impl FileSettings {
    /// Read and parse a settings file that must exist.
    pub fn read(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        serde_json::from_str(&text)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Like [`FileSettings::read`] but a missing file yields `None`.
    pub fn read_optional(path: &Path) -> ConfigResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        Self::read(path).map(Some)
    }
}

/// Fully resolved configuration for one process run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Primary account first; the secondary one only when fully configured.
    pub accounts: Vec<AccountConfig>,
    /// Directory path or `http(s)://` blob container URL.
    pub storage_location: String,
    pub storage_token: Option<String>,
    /// External automation command, split on whitespace.
    pub scraper_command: Option<Vec<String>>,
    pub publish_dir: Option<PathBuf>,
    pub covers_dir: Option<PathBuf>,
    pub source_timeout: Duration,
}

impl AppConfig {
    /// Load from `path` (or `appsettings.json` in the working directory when
    /// present) and the process environment.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let file = match path {
            Some(p) => Some(FileSettings::read(p)?),
            None => FileSettings::read_optional(Path::new(DEFAULT_SETTINGS_FILE))?,
        };
        Self::resolve(file.unwrap_or_default(), |key| std::env::var(key).ok())
    }

    /// Combine file settings with values from `env`. Non-blank env values win.
    pub fn resolve(file: FileSettings, env: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let pick = |var: &str, fallback: Option<String>| non_blank(env(var)).or_else(|| non_blank(fallback));

        let username = pick("LIBRARY_USERNAME", file.library_username);
        let password = pick("LIBRARY_PASSWORD", file.library_password);
        let primary = match (username, password) {
            (Some(username), Some(password)) => {
                AccountConfig { key: PRIMARY_ACCOUNT_KEY.to_owned(), username, password }
            },
            (username, _) => {
                let missing = if username.is_none() { "LibraryUsername" } else { "LibraryPassword" };
                return Err(ConfigError::MissingCredentials { missing: missing.to_owned() });
            },
        };

        let mut accounts = vec![primary];
        match (
            pick("LIBRARY_USERNAME_2", file.library_username2),
            pick("LIBRARY_PASSWORD_2", file.library_password2),
        ) {
            (Some(username), Some(password)) => {
                accounts.push(AccountConfig {
                    key: SECONDARY_ACCOUNT_KEY.to_owned(),
                    username,
                    password,
                });
            },
            (None, None) => {
                tracing::debug!("no secondary account configured");
            },
            _ => {
                tracing::info!("secondary account credentials incomplete, skipping it");
            },
        }

        let storage_location = match pick("BIBLIO_STORAGE", file.storage_location) {
            Some(location) => location,
            None => default_storage_dir().to_string_lossy().into_owned(),
        };

        let scraper_command = pick("BIBLIO_SCRAPER_CMD", file.scraper_command)
            .map(|cmd| cmd.split_whitespace().map(str::to_owned).collect::<Vec<_>>());

        let file_timeout = file.source_timeout_secs.unwrap_or(DEFAULT_SOURCE_TIMEOUT_SECS);
        let timeout_secs =
            parse_with_default("BIBLIO_SOURCE_TIMEOUT_SECS", non_blank(env("BIBLIO_SOURCE_TIMEOUT_SECS")), file_timeout);
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid("source timeout must be greater than zero".to_owned()));
        }

        Ok(Self {
            accounts,
            storage_location,
            storage_token: pick("BIBLIO_STORAGE_TOKEN", file.storage_token),
            scraper_command,
            publish_dir: non_blank(env("BIBLIO_PUBLISH_DIR")).map(PathBuf::from).or(file.publish_dir),
            covers_dir: non_blank(env("BIBLIO_COVERS_DIR")).map(PathBuf::from).or(file.covers_dir),
            source_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// The configured account stored under `key`, if any.
    #[must_use]
    pub fn account(&self, key: &str) -> Option<&AccountConfig> {
        self.accounts.iter().find(|a| a.key == key)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// `<platform data dir>/biblio-sync`, or `./biblio-sync` when the platform has none.
#[must_use]
pub fn default_storage_dir() -> PathBuf {
    dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")).join(DEFAULT_DATA_DIR_NAME)
}
