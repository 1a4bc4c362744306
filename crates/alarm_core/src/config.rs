//! Runtime configuration for stores and logging.
//!
//! # Responsibility
//! - Describe where alarm data and logs live and which store backend is used.
//! - Resolve configuration from environment variables with safe defaults.
//!
//! # Invariants
//! - Resolution never fails; unknown or empty values fall back to defaults.

use crate::logging::default_log_level;
use std::path::{Path, PathBuf};

/// File name of the JSON alarm store.
pub const DEFAULT_STORE_FILE_NAME: &str = "Task.json";
/// File name of the SQLite alarm store.
pub const SQLITE_STORE_FILE_NAME: &str = "alarms.sqlite3";

pub const ENV_DATA_DIR: &str = "ALARM_DATA_DIR";
pub const ENV_STORE_BACKEND: &str = "ALARM_STORE_BACKEND";
pub const ENV_LOG_LEVEL: &str = "ALARM_LOG_LEVEL";

const DEFAULT_DATA_DIR_NAME: &str = "alarm_core";
const LOG_DIR_NAME: &str = "logs";
const DEFAULT_MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const DEFAULT_MAX_LOG_FILES: usize = 5;

/// Persistence backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Json,
    Sqlite,
}

impl StoreBackend {
    /// Parses `json` or `sqlite` (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "sqlite" => Some(Self::Sqlite),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Sqlite => "sqlite",
        }
    }
}

/// Location and backend of the alarm store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Application-private directory holding the store file.
    pub data_dir: PathBuf,
}

impl StoreConfig {
    pub fn new(backend: StoreBackend, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            data_dir: data_dir.into(),
        }
    }

    /// Full path of the backing file for the selected backend.
    pub fn store_path(&self) -> PathBuf {
        let file_name = match self.backend {
            StoreBackend::Json => DEFAULT_STORE_FILE_NAME,
            StoreBackend::Sqlite => SQLITE_STORE_FILE_NAME,
        };
        self.data_dir.join(file_name)
    }
}

/// Rolling file log settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// One of `trace|debug|info|warn|error`.
    pub level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: PathBuf,
    pub max_file_size_bytes: u64,
    pub max_files: usize,
}

impl LoggingConfig {
    /// Creates a config with default rotation limits.
    pub fn new(level: impl Into<String>, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            level: level.into(),
            log_dir: log_dir.into(),
            max_file_size_bytes: DEFAULT_MAX_LOG_FILE_SIZE_BYTES,
            max_files: DEFAULT_MAX_LOG_FILES,
        }
    }
}

/// Combined core configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

impl CoreConfig {
    /// Builds defaults rooted at `data_dir`: JSON store, logs in `data_dir/logs`.
    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            store: StoreConfig::new(StoreBackend::default(), data_dir),
            logging: LoggingConfig::new(default_log_level(), data_dir.join(LOG_DIR_NAME)),
        }
    }

    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through `lookup`, which maps variable names to
    /// values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let data_dir = non_empty(ENV_DATA_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DATA_DIR_NAME));
        let mut config = Self::with_data_dir(&data_dir);

        if let Some(backend) = non_empty(ENV_STORE_BACKEND).and_then(|raw| StoreBackend::parse(&raw)) {
            config.store.backend = backend;
        }
        if let Some(level) = non_empty(ENV_LOG_LEVEL) {
            config.logging.level = level;
        }
        config
    }
}
