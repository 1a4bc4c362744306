//! Core scheduling logic for daily alarms.
//! This crate is the single source of truth for alarm invariants.

pub mod clock;
pub mod config;
pub mod logging;
pub mod model;
pub mod notify;
pub mod service;
pub mod store;

pub use clock::{format_clock_time, parse_clock_time, start_of_day, start_of_today, ClockError};
pub use config::{CoreConfig, LoggingConfig, StoreBackend, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::alarm::{Alarm, AlarmId, AlarmValidationError, FireTime};
pub use notify::{
    InMemoryNotificationCenter, NotificationRequest, NotificationScheduler, SchedulerError,
    SchedulerResult,
};
pub use service::alarm_controller::AlarmController;
pub use store::{
    open_store, AlarmStore, InMemoryAlarmStore, JsonFileAlarmStore, SqliteAlarmStore, StoreError,
    StoreFailure, StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
