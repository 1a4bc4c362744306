//! Notification scheduler contract.
//!
//! # Responsibility
//! - Describe the two operations the core needs from a local notification
//!   service: register a daily trigger and cancel it.
//! - Keep platform delivery details outside the core.
//!
//! # Invariants
//! - Registrations are keyed by `AlarmId`; scheduling an id that is already
//!   registered replaces the previous registration.
//! - Cancelling an unknown id is a no-op.

mod memory;

pub use memory::InMemoryNotificationCenter;

use crate::model::alarm::AlarmId;
use chrono::{NaiveTime, Timelike};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Title used for every alarm notification.
pub const NOTIFICATION_TITLE: &str = "Alarm";

pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Outbound registration record for one alarm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub id: AlarmId,
    pub title: String,
    pub body: String,
    /// Local wall-clock time at which the notification fires.
    pub trigger: NaiveTime,
    pub repeats_daily: bool,
}

impl NotificationRequest {
    /// Builds the standard daily-repeating alarm notification.
    pub fn daily(id: AlarmId, body: impl Into<String>, trigger: NaiveTime) -> Self {
        Self {
            id,
            title: NOTIFICATION_TITLE.to_string(),
            body: body.into(),
            trigger,
            repeats_daily: true,
        }
    }

    /// Trigger expressed as seconds after local midnight.
    pub fn trigger_seconds_from_midnight(&self) -> u32 {
        self.trigger.num_seconds_from_midnight()
    }
}

/// Failure reported by a notification service adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// The service refused a registration or removal for one alarm.
    Rejected { id: AlarmId, reason: String },
    /// The service could not be reached at all.
    Unavailable(String),
}

impl Display for SchedulerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected { id, reason } => {
                write!(f, "notification request for {id} rejected: {reason}")
            }
            Self::Unavailable(reason) => write!(f, "notification service unavailable: {reason}"),
        }
    }
}

impl Error for SchedulerError {}

/// Local notification service used by `AlarmController`.
pub trait NotificationScheduler {
    /// Registers (or replaces) the daily trigger for `request.id`.
    fn schedule(&self, request: &NotificationRequest) -> SchedulerResult<()>;
    /// Removes the pending trigger for `id`, if any.
    fn cancel(&self, id: &AlarmId) -> SchedulerResult<()>;
}

impl<T: NotificationScheduler + ?Sized> NotificationScheduler for Arc<T> {
    fn schedule(&self, request: &NotificationRequest) -> SchedulerResult<()> {
        (**self).schedule(request)
    }

    fn cancel(&self, id: &AlarmId) -> SchedulerResult<()> {
        (**self).cancel(id)
    }
}
