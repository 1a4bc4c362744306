//! Alarm controller.
//!
//! # Responsibility
//! - Own the ordered in-memory alarm collection.
//! - Keep notification registrations in step with each alarm's state.
//! - Write the full collection through to the store after every mutation.
//!
//! # Invariants
//! - After each operation an alarm is registered with the scheduler iff it is
//!   enabled and its fire date resolves.
//! - The scheduler call reflects the state *before* a toggle flips the flag.
//! - Store and scheduler failures are logged and swallowed; they never roll
//!   back or corrupt the in-memory collection.

use crate::model::alarm::{Alarm, AlarmId, FireTime};
use crate::notify::NotificationScheduler;
use crate::store::AlarmStore;
use log::{debug, error, info, warn};

/// Request/response facade over the alarm collection.
///
/// Construct one per process and hand it to the UI layer by reference.
pub struct AlarmController<S, P>
where
    S: NotificationScheduler,
    P: AlarmStore,
{
    alarms: Vec<Alarm>,
    scheduler: S,
    store: P,
}

impl<S, P> AlarmController<S, P>
where
    S: NotificationScheduler,
    P: AlarmStore,
{
    /// Loads the collection from `store`.
    ///
    /// A read failure (missing or corrupt data) starts with an empty
    /// collection.
    pub fn open(scheduler: S, store: P) -> Self {
        let alarms = match store.load() {
            Ok(alarms) => {
                info!(
                    "event=alarm_load module=controller status=ok count={}",
                    alarms.len()
                );
                alarms
            }
            Err(err) => {
                warn!(
                    "event=alarm_load module=controller status=fallback_empty error={}",
                    err
                );
                Vec::new()
            }
        };
        Self::with_alarms(scheduler, store, alarms)
    }

    /// Wraps an already loaded collection without touching the store.
    pub fn with_alarms(scheduler: S, store: P, alarms: Vec<Alarm>) -> Self {
        Self {
            alarms,
            scheduler,
            store,
        }
    }

    /// Current alarms in insertion order.
    pub fn alarms(&self) -> &[Alarm] {
        &self.alarms
    }

    pub fn get(&self, id: &AlarmId) -> Option<&Alarm> {
        self.alarms.iter().find(|alarm| alarm.id() == id)
    }

    pub fn len(&self) -> usize {
        self.alarms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alarms.is_empty()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    /// Creates an enabled alarm, appends it, schedules it and persists.
    pub fn add(&mut self, fire_time: FireTime, name: impl Into<String>) -> Alarm {
        let alarm = Alarm::new(fire_time, name);
        self.alarms.push(alarm.clone());
        self.register(&alarm);
        self.persist("alarm_add");
        info!(
            "event=alarm_add module=controller status=ok alarm_id={} fire_time={}",
            alarm.id(),
            fire_time.seconds()
        );
        alarm
    }

    /// Changes name and fire time of an existing alarm in place.
    ///
    /// The old registration is always cancelled; a new one is created under
    /// the same id only when the alarm is enabled. Returns the updated alarm,
    /// or `None` for an unknown id.
    pub fn update(
        &mut self,
        id: &AlarmId,
        fire_time: FireTime,
        name: impl Into<String>,
    ) -> Option<Alarm> {
        let Some(index) = self.position(id) else {
            warn!("event=alarm_update module=controller status=not_found alarm_id={id}");
            return None;
        };

        self.deregister(id);
        self.alarms[index].reschedule(fire_time, name.into());
        if self.alarms[index].is_enabled() {
            self.register(&self.alarms[index]);
        }
        self.persist("alarm_update");

        let updated = self.alarms[index].clone();
        info!(
            "event=alarm_update module=controller status=ok alarm_id={} fire_time={} enabled={}",
            id,
            fire_time.seconds(),
            updated.is_enabled()
        );
        Some(updated)
    }

    /// Removes the alarm with `id` if present, cancels its registration and
    /// persists. Returns whether an alarm was removed.
    pub fn delete(&mut self, id: &AlarmId) -> bool {
        let removed = match self.position(id) {
            Some(index) => {
                self.alarms.remove(index);
                true
            }
            None => {
                debug!("event=alarm_delete module=controller status=not_found alarm_id={id}");
                false
            }
        };

        self.deregister(id);
        self.persist("alarm_delete");
        if removed {
            info!("event=alarm_delete module=controller status=ok alarm_id={id}");
        }
        removed
    }

    /// Flips `enabled`, cancelling an active alarm or scheduling an inactive
    /// one first. Returns the new flag, or `None` for an unknown id.
    pub fn toggle_enabled(&mut self, id: &AlarmId) -> Option<bool> {
        let Some(index) = self.position(id) else {
            warn!("event=alarm_toggle module=controller status=not_found alarm_id={id}");
            return None;
        };

        let was_enabled = self.alarms[index].is_enabled();
        if was_enabled {
            self.deregister(id);
        } else {
            self.register(&self.alarms[index]);
        }
        self.alarms[index].set_enabled(!was_enabled);
        self.persist("alarm_toggle");

        info!(
            "event=alarm_toggle module=controller status=ok alarm_id={} enabled={}",
            id, !was_enabled
        );
        Some(!was_enabled)
    }

    /// Re-applies every alarm's registration state to the scheduler.
    ///
    /// Hosts call this after startup so a fresh notification service matches
    /// the loaded collection.
    pub fn resync_notifications(&self) {
        for alarm in &self.alarms {
            self.deregister(alarm.id());
            if alarm.is_enabled() {
                self.register(alarm);
            }
        }
        info!(
            "event=alarm_resync module=controller status=ok count={}",
            self.alarms.len()
        );
    }

    fn position(&self, id: &AlarmId) -> Option<usize> {
        self.alarms.iter().position(|alarm| alarm.id() == id)
    }

    fn register(&self, alarm: &Alarm) {
        let Some(request) = alarm.notification_request() else {
            warn!(
                "event=notification_schedule module=controller status=skipped alarm_id={} reason=unresolvable_fire_date",
                alarm.id()
            );
            return;
        };
        if let Err(err) = self.scheduler.schedule(&request) {
            error!(
                "event=notification_schedule module=controller status=error alarm_id={} error={}",
                alarm.id(),
                err
            );
        }
    }

    fn deregister(&self, id: &AlarmId) {
        if let Err(err) = self.scheduler.cancel(id) {
            error!(
                "event=notification_cancel module=controller status=error alarm_id={} error={}",
                id, err
            );
        }
    }

    fn persist(&self, operation: &'static str) {
        if let Err(err) = self.store.save(&self.alarms) {
            error!(
                "event={} module=controller status=persist_failed count={} error={}",
                operation,
                self.alarms.len(),
                err
            );
        }
    }
}
