//! Alarm domain model.
//!
//! # Responsibility
//! - Define the persisted alarm record and its validated fire-time offset.
//! - Derive fire dates, display text and notification requests on demand.
//!
//! # Invariants
//! - `id` is generated once and never recomputed or reused.
//! - `fire_time_from_midnight` is always in `[0, 86400)`.
//! - Equality and hashing use `id` only.

use crate::clock::{start_of_today, CLOCK_DISPLAY_FORMAT, SECONDS_PER_DAY};
use crate::notify::NotificationRequest;
use chrono::{DateTime, Local, NaiveTime, TimeDelta, TimeZone};
use log::warn;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Validation errors for alarm identity and fire time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlarmValidationError {
    EmptyId,
    FireTimeOutOfRange(u32),
    /// Negative, NaN or infinite offset read from stored data.
    FireTimeNotRepresentable(String),
}

impl Display for AlarmValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "alarm id must not be empty"),
            Self::FireTimeOutOfRange(value) => write!(
                f,
                "fireTimeFromMidnight ({value}) must be < {SECONDS_PER_DAY}"
            ),
            Self::FireTimeNotRepresentable(value) => write!(
                f,
                "fireTimeFromMidnight ({value}) must be a finite, non-negative number"
            ),
        }
    }
}

impl Error for AlarmValidationError {}

/// Opaque, stable alarm identifier.
///
/// Serialized as a bare string; also used as the notification registration key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AlarmId(String);

impl AlarmId {
    /// Generates a fresh identifier from a random v4 UUID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps an existing identifier verbatim.
    ///
    /// # Errors
    /// - `EmptyId` when `value` is empty or whitespace only.
    pub fn parse(value: &str) -> Result<Self, AlarmValidationError> {
        if value.trim().is_empty() {
            return Err(AlarmValidationError::EmptyId);
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AlarmId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AlarmId {
    type Error = AlarmValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().is_empty() {
            return Err(AlarmValidationError::EmptyId);
        }
        Ok(Self(value))
    }
}

impl From<AlarmId> for String {
    fn from(value: AlarmId) -> Self {
        value.0
    }
}

/// Offset from local midnight, in whole seconds.
///
/// Stored data may carry fractional seconds; they are truncated on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "u32")]
pub struct FireTime(u32);

impl FireTime {
    pub const MIDNIGHT: Self = Self(0);

    /// Validates a raw offset.
    ///
    /// # Errors
    /// - `FireTimeOutOfRange` when `seconds >= 86400`.
    pub fn new(seconds: u32) -> Result<Self, AlarmValidationError> {
        if seconds >= SECONDS_PER_DAY {
            return Err(AlarmValidationError::FireTimeOutOfRange(seconds));
        }
        Ok(Self(seconds))
    }

    /// Folds any signed offset into one day, so `-3600` becomes 23:00 and
    /// `90000` becomes 01:00.
    pub fn wrapping(seconds: i64) -> Self {
        Self(seconds.rem_euclid(i64::from(SECONDS_PER_DAY)) as u32)
    }

    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Result<Self, AlarmValidationError> {
        Self::new(
            hour.saturating_mul(3600)
                .saturating_add(minute.saturating_mul(60))
                .saturating_add(second),
        )
    }

    pub fn seconds(self) -> u32 {
        self.0
    }

    /// Wall-clock time of day represented by this offset.
    pub fn time_of_day(self) -> NaiveTime {
        NaiveTime::from_num_seconds_from_midnight_opt(self.0, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl TryFrom<u32> for FireTime {
    type Error = AlarmValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<f64> for FireTime {
    type Error = AlarmValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() || value < 0.0 {
            return Err(AlarmValidationError::FireTimeNotRepresentable(
                value.to_string(),
            ));
        }
        // `as` saturates, so huge offsets still land in `FireTimeOutOfRange`.
        Self::new(value.trunc() as u32)
    }
}

impl From<FireTime> for u32 {
    fn from(value: FireTime) -> Self {
        value.0
    }
}

/// One daily alarm.
///
/// Instances are owned by `AlarmController`; mutation happens only through its
/// operations, so setters are crate-private.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alarm {
    id: AlarmId,
    name: String,
    fire_time_from_midnight: FireTime,
    #[serde(default = "default_enabled")]
    enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Alarm {
    /// Creates an enabled alarm with a freshly generated id.
    pub fn new(fire_time: FireTime, name: impl Into<String>) -> Self {
        Self::with_id(AlarmId::generate(), fire_time, name)
    }

    /// Creates an enabled alarm with a caller-provided id.
    ///
    /// Used by import paths where identity already exists.
    pub fn with_id(id: AlarmId, fire_time: FireTime, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            fire_time_from_midnight: fire_time,
            enabled: true,
        }
    }

    pub(crate) fn from_parts(id: AlarmId, name: String, fire_time: FireTime, enabled: bool) -> Self {
        Self {
            id,
            name,
            fire_time_from_midnight: fire_time,
            enabled,
        }
    }

    pub fn id(&self) -> &AlarmId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fire_time(&self) -> FireTime {
        self.fire_time_from_midnight
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn reschedule(&mut self, fire_time: FireTime, name: String) {
        self.name = name;
        self.fire_time_from_midnight = fire_time;
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Fire instant for the day starting at `start_of_day`.
    pub fn fire_date_from<Tz: TimeZone>(&self, start_of_day: &DateTime<Tz>) -> DateTime<Tz> {
        start_of_day.clone() + TimeDelta::seconds(i64::from(self.fire_time_from_midnight.0))
    }

    /// Today's fire instant, or `None` when local midnight cannot be resolved.
    pub fn fire_date(&self) -> Option<DateTime<Local>> {
        match start_of_today() {
            Ok(start) => Some(self.fire_date_from(&start)),
            Err(err) => {
                warn!(
                    "event=fire_date module=model status=error alarm_id={} error={}",
                    self.id, err
                );
                None
            }
        }
    }

    /// Human-readable fire time such as `7:00 AM`.
    pub fn fire_time_as_string(&self) -> Option<String> {
        self.fire_date()
            .map(|date| date.format(CLOCK_DISPLAY_FORMAT).to_string())
    }

    /// Builds the daily notification registration for this alarm.
    ///
    /// Returns `None` when the fire date cannot be resolved; the trigger is the
    /// local time of day of `fire_date()`.
    pub fn notification_request(&self) -> Option<NotificationRequest> {
        self.fire_date()
            .map(|date| NotificationRequest::daily(self.id.clone(), self.name.clone(), date.time()))
    }
}

impl PartialEq for Alarm {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Alarm {}

impl Hash for Alarm {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
