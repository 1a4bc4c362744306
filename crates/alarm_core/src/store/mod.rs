//! Alarm persistence contracts and backends.
//!
//! # Responsibility
//! - Define the whole-collection load/save contract used by the controller.
//! - Provide JSON-file, SQLite and in-memory backends.
//!
//! # Invariants
//! - `save` replaces the complete stored collection; there is no append path.
//! - `load` returns alarms in the order they were saved.
//! - Malformed data is always a `StoreError::Read`.
//! - A missing JSON file or a never-saved in-memory store is
//!   `StoreError::Read(StoreFailure::Missing)`. The SQLite store creates its
//!   table on open, so a new database loads as an empty `Ok`.

mod json;
mod memory;
mod sqlite;

pub use json::JsonFileAlarmStore;
pub use memory::InMemoryAlarmStore;
pub use sqlite::SqliteAlarmStore;

use crate::config::{StoreBackend, StoreConfig};
use crate::model::alarm::Alarm;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type StoreResult<T> = Result<T, StoreError>;

/// Cause of a store failure.
#[derive(Debug)]
pub enum StoreFailure {
    /// Nothing has been stored yet at this location.
    Missing(String),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Malformed(serde_json::Error),
    Sqlite(rusqlite::Error),
    InvalidData(String),
}

impl Display for StoreFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(location) => write!(f, "no stored alarms at {location}"),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Malformed(err) => write!(f, "malformed alarm data: {err}"),
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::InvalidData(message) => write!(f, "invalid stored alarm data: {message}"),
        }
    }
}

/// Store error split by direction so callers can apply the matching recovery.
#[derive(Debug)]
pub enum StoreError {
    Read(StoreFailure),
    Write(StoreFailure),
}

impl StoreError {
    pub fn failure(&self) -> &StoreFailure {
        match self {
            Self::Read(failure) | Self::Write(failure) => failure,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read(failure) => write!(f, "alarm store read failed: {failure}"),
            Self::Write(failure) => write!(f, "alarm store write failed: {failure}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self.failure() {
            StoreFailure::Io { source, .. } => Some(source),
            StoreFailure::Malformed(err) => Some(err),
            StoreFailure::Sqlite(err) => Some(err),
            StoreFailure::Missing(_) | StoreFailure::InvalidData(_) => None,
        }
    }
}

/// Durable storage for the full, ordered alarm collection.
pub trait AlarmStore {
    fn load(&self) -> StoreResult<Vec<Alarm>>;
    fn save(&self, alarms: &[Alarm]) -> StoreResult<()>;
}

impl<T: AlarmStore + ?Sized> AlarmStore for Box<T> {
    fn load(&self) -> StoreResult<Vec<Alarm>> {
        (**self).load()
    }

    fn save(&self, alarms: &[Alarm]) -> StoreResult<()> {
        (**self).save(alarms)
    }
}

/// Opens the backend selected by `config` at `config.store_path()`.
///
/// # Errors
/// - `StoreError::Read(_)` when the SQLite file cannot be opened or its
///   table cannot be created. The JSON backend does not touch disk here.
pub fn open_store(config: &StoreConfig) -> StoreResult<Box<dyn AlarmStore + Send>> {
    match config.backend {
        StoreBackend::Json => Ok(Box::new(JsonFileAlarmStore::new(config.store_path()))),
        StoreBackend::Sqlite => {
            let store = SqliteAlarmStore::open(config.store_path())
                .map_err(StoreError::Read)?;
            Ok(Box::new(store))
        }
    }
}
