//! In-process notification registration table.
//!
//! Hosts without a native binding read `pending()` and mirror it into the
//! platform notification service.

use super::{NotificationRequest, NotificationScheduler, SchedulerResult};
use crate::model::alarm::AlarmId;
use log::debug;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Thread-safe registration table with replace-not-duplicate semantics.
#[derive(Debug, Default)]
pub struct InMemoryNotificationCenter {
    registrations: Mutex<BTreeMap<AlarmId, NotificationRequest>>,
}

impl InMemoryNotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all pending registrations ordered by id.
    pub fn pending(&self) -> Vec<NotificationRequest> {
        self.lock().values().cloned().collect()
    }

    pub fn pending_for(&self, id: &AlarmId) -> Option<NotificationRequest> {
        self.lock().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<AlarmId, NotificationRequest>> {
        self.registrations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl NotificationScheduler for InMemoryNotificationCenter {
    fn schedule(&self, request: &NotificationRequest) -> SchedulerResult<()> {
        let mut registrations = self.lock();
        let replaced = registrations
            .insert(request.id.clone(), request.clone())
            .is_some();
        debug!(
            "event=notification_schedule module=notify status=ok alarm_id={} trigger={} replaced={}",
            request.id, request.trigger, replaced
        );
        Ok(())
    }

    fn cancel(&self, id: &AlarmId) -> SchedulerResult<()> {
        let mut registrations = self.lock();
        let removed = registrations.remove(id).is_some();
        debug!(
            "event=notification_cancel module=notify status=ok alarm_id={} removed={}",
            id, removed
        );
        Ok(())
    }
}
