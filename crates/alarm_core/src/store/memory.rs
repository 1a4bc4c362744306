//! In-memory alarm store for tests and ephemeral hosts.

use super::{AlarmStore, StoreError, StoreFailure, StoreResult};
use crate::model::alarm::Alarm;
use std::sync::{Mutex, PoisonError};

/// Keeps the last saved collection in process memory.
///
/// A store that was never saved behaves like a missing file on `load`.
#[derive(Debug, Default)]
pub struct InMemoryAlarmStore {
    saved: Mutex<Option<Vec<Alarm>>>,
}

impl InMemoryAlarmStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `alarms`.
    pub fn with_alarms(alarms: Vec<Alarm>) -> Self {
        Self {
            saved: Mutex::new(Some(alarms)),
        }
    }

    /// Returns the last saved collection.
    pub fn snapshot(&self) -> Option<Vec<Alarm>> {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl AlarmStore for InMemoryAlarmStore {
    fn load(&self) -> StoreResult<Vec<Alarm>> {
        self.snapshot()
            .ok_or_else(|| StoreError::Read(StoreFailure::Missing("memory".to_string())))
    }

    fn save(&self, alarms: &[Alarm]) -> StoreResult<()> {
        *self.saved.lock().unwrap_or_else(PoisonError::into_inner) = Some(alarms.to_vec());
        Ok(())
    }
}
