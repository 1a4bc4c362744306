//! JSON file alarm store.
//!
//! The file holds one array of `{id, name, fireTimeFromMidnight, enabled}`
//! records. Saves write a sibling temp file and rename it over the target, so
//! a reader sees either the previous or the new collection.

use super::{AlarmStore, StoreError, StoreFailure, StoreResult};
use crate::config::DEFAULT_STORE_FILE_NAME;
use crate::model::alarm::Alarm;
use log::{debug, info};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const TEMP_SUFFIX: &str = ".tmp";

/// Single-file JSON backend.
#[derive(Debug, Clone)]
pub struct JsonFileAlarmStore {
    path: PathBuf,
}

impl JsonFileAlarmStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `dir/Task.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(DEFAULT_STORE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(TEMP_SUFFIX);
        PathBuf::from(name)
    }

    fn io_failure(path: &Path, source: std::io::Error) -> StoreFailure {
        StoreFailure::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl AlarmStore for JsonFileAlarmStore {
    fn load(&self) -> StoreResult<Vec<Alarm>> {
        let bytes = fs::read(&self.path).map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                StoreError::Read(StoreFailure::Missing(self.path.display().to_string()))
            } else {
                StoreError::Read(Self::io_failure(&self.path, err))
            }
        })?;

        let alarms: Vec<Alarm> = serde_json::from_slice(&bytes)
            .map_err(|err| StoreError::Read(StoreFailure::Malformed(err)))?;

        debug!(
            "event=store_load module=store backend=json status=ok count={}",
            alarms.len()
        );
        Ok(alarms)
    }

    fn save(&self, alarms: &[Alarm]) -> StoreResult<()> {
        let payload = serde_json::to_vec_pretty(alarms)
            .map_err(|err| StoreError::Write(StoreFailure::Malformed(err)))?;

        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|err| StoreError::Write(Self::io_failure(parent, err)))?;
        }

        let temp_path = self.temp_path();
        fs::write(&temp_path, payload)
            .map_err(|err| StoreError::Write(Self::io_failure(&temp_path, err)))?;
        if let Err(err) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(StoreError::Write(Self::io_failure(&self.path, err)));
        }

        info!(
            "event=store_save module=store backend=json status=ok count={}",
            alarms.len()
        );
        Ok(())
    }
}
