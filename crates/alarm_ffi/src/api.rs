//! FFI use-case API for the alarm UI.
//!
//! # Responsibility
//! - Expose the alarm controller operations to Dart via FRB.
//! - Hold the one process-wide controller and serialize access to it.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every mutation and its persistence write run under one lock.
//! - Notification registrations are mirrored by the host from
//!   `alarm_pending_notifications`; the core never calls platform APIs.

use alarm_core::{
    core_version as core_version_inner, format_clock_time, init_logging as init_logging_inner,
    open_store, parse_clock_time, Alarm, AlarmController, AlarmId, AlarmStore, CoreConfig,
    FireTime, InMemoryNotificationCenter, LoggingConfig, NotificationRequest, StoreConfig,
};
use log::{error, info};
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};

type FfiController = AlarmController<InMemoryNotificationCenter, Box<dyn AlarmStore + Send>>;

static ALARM_DATA_DIR: OnceLock<PathBuf> = OnceLock::new();
static CONTROLLER: OnceLock<Mutex<FfiController>> = OnceLock::new();

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    let config = LoggingConfig::new(level.trim(), PathBuf::from(log_dir.trim()));
    match init_logging_inner(&config) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Sets the application-private directory holding `Task.json`.
///
/// # FFI contract
/// - Must be called before the first alarm call to take effect.
/// - Repeating the same directory is accepted; a different one is rejected.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_alarm_data_dir(data_dir: String) -> String {
    let trimmed = data_dir.trim();
    if trimmed.is_empty() {
        return "data_dir cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = ALARM_DATA_DIR.get_or_init(|| requested.clone());
    if *active != requested {
        return format!(
            "alarm data dir already set to `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        );
    }
    String::new()
}

/// Alarm row returned to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmItem {
    pub id: String,
    pub name: String,
    pub fire_time_from_midnight: u32,
    /// Display text such as `7:00 AM`.
    pub fire_time_text: String,
    pub enabled: bool,
}

/// Notification registration the host must keep active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationItem {
    pub id: String,
    pub title: String,
    pub body: String,
    pub trigger_seconds_from_midnight: u32,
    pub repeats_daily: bool,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmActionResponse {
    pub ok: bool,
    /// Alarm state after the action, when one applies.
    pub alarm: Option<AlarmItem>,
    pub message: String,
}

impl AlarmActionResponse {
    fn success(message: impl Into<String>, alarm: Option<AlarmItem>) -> Self {
        Self {
            ok: true,
            alarm,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            alarm: None,
            message: message.into(),
        }
    }
}

/// Lists alarms in insertion order.
///
/// # FFI contract
/// - Never panics; returns an empty list when the store cannot be opened.
#[flutter_rust_bridge::frb(sync)]
pub fn alarm_list() -> Vec<AlarmItem> {
    with_controller(|controller| controller.alarms().iter().map(to_alarm_item).collect())
        .unwrap_or_default()
}

/// Creates an alarm at `fire_time_from_midnight` seconds.
///
/// Offsets outside one day (e.g. from a date picker across a DST change) are
/// folded into `[0, 86400)`.
#[flutter_rust_bridge::frb(sync)]
pub fn alarm_add(fire_time_from_midnight: i64, name: String) -> AlarmActionResponse {
    let fire_time = FireTime::wrapping(fire_time_from_midnight);
    add_alarm(fire_time, name)
}

/// Creates an alarm from clock text such as `07:00` or `7:00 pm`.
#[flutter_rust_bridge::frb(sync)]
pub fn alarm_add_at(clock_time: String, name: String) -> AlarmActionResponse {
    match parse_clock_time(&clock_time) {
        Ok(fire_time) => add_alarm(fire_time, name),
        Err(err) => AlarmActionResponse::failure(format!("alarm_add_at failed: {err}")),
    }
}

/// Changes name and fire time of an alarm; its enabled flag is unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn alarm_update(id: String, fire_time_from_midnight: i64, name: String) -> AlarmActionResponse {
    let id = match AlarmId::parse(&id) {
        Ok(id) => id,
        Err(err) => return AlarmActionResponse::failure(format!("alarm_update failed: {err}")),
    };
    let fire_time = FireTime::wrapping(fire_time_from_midnight);
    match with_controller(|controller| controller.update(&id, fire_time, name)) {
        Ok(Some(alarm)) => {
            AlarmActionResponse::success("Alarm updated.", Some(to_alarm_item(&alarm)))
        }
        Ok(None) => AlarmActionResponse::failure(format!("alarm not found: {id}")),
        Err(err) => AlarmActionResponse::failure(format!("alarm_update failed: {err}")),
    }
}

/// Deletes an alarm; deleting an unknown id succeeds without changes.
#[flutter_rust_bridge::frb(sync)]
pub fn alarm_delete(id: String) -> AlarmActionResponse {
    let id = match AlarmId::parse(&id) {
        Ok(id) => id,
        Err(err) => return AlarmActionResponse::failure(format!("alarm_delete failed: {err}")),
    };
    match with_controller(|controller| controller.delete(&id)) {
        Ok(true) => AlarmActionResponse::success("Alarm deleted.", None),
        Ok(false) => AlarmActionResponse::success("Alarm not found; nothing deleted.", None),
        Err(err) => AlarmActionResponse::failure(format!("alarm_delete failed: {err}")),
    }
}

/// Flips the enabled flag of an alarm.
#[flutter_rust_bridge::frb(sync)]
pub fn alarm_toggle_enabled(id: String) -> AlarmActionResponse {
    let id = match AlarmId::parse(&id) {
        Ok(id) => id,
        Err(err) => {
            return AlarmActionResponse::failure(format!("alarm_toggle_enabled failed: {err}"))
        }
    };
    let result = with_controller(|controller| {
        controller
            .toggle_enabled(&id)
            .and_then(|_| controller.get(&id).map(to_alarm_item))
    });
    match result {
        Ok(Some(item)) => {
            let message = if item.enabled {
                "Alarm enabled."
            } else {
                "Alarm disabled."
            };
            AlarmActionResponse::success(message, Some(item))
        }
        Ok(None) => AlarmActionResponse::failure(format!("alarm not found: {id}")),
        Err(err) => AlarmActionResponse::failure(format!("alarm_toggle_enabled failed: {err}")),
    }
}

/// Returns the registrations the host notification service must hold.
#[flutter_rust_bridge::frb(sync)]
pub fn alarm_pending_notifications() -> Vec<NotificationItem> {
    with_controller(|controller| {
        controller
            .scheduler()
            .pending()
            .into_iter()
            .map(to_notification_item)
            .collect()
    })
    .unwrap_or_default()
}

fn add_alarm(fire_time: FireTime, name: String) -> AlarmActionResponse {
    match with_controller(|controller| controller.add(fire_time, name)) {
        Ok(alarm) => AlarmActionResponse::success("Alarm created.", Some(to_alarm_item(&alarm))),
        Err(err) => AlarmActionResponse::failure(format!("alarm_add failed: {err}")),
    }
}

fn resolve_store_config() -> StoreConfig {
    let mut config = CoreConfig::from_env().store;
    if let Some(data_dir) = ALARM_DATA_DIR.get() {
        config.data_dir = data_dir.clone();
    }
    config
}

fn with_controller<T>(f: impl FnOnce(&mut FfiController) -> T) -> Result<T, String> {
    let controller = match CONTROLLER.get() {
        Some(controller) => controller,
        None => {
            let config = resolve_store_config();
            let store = open_store(&config).map_err(|err| {
                error!(
                    "event=ffi_controller_open module=ffi status=error backend={} error={}",
                    config.backend.as_str(),
                    err
                );
                format!("alarm store open failed: {err}")
            })?;
            let controller = AlarmController::open(InMemoryNotificationCenter::new(), store);
            controller.resync_notifications();
            info!(
                "event=ffi_controller_open module=ffi status=ok backend={} count={}",
                config.backend.as_str(),
                controller.len()
            );
            CONTROLLER.get_or_init(|| Mutex::new(controller))
        }
    };

    let mut guard = controller.lock().unwrap_or_else(PoisonError::into_inner);
    Ok(f(&mut *guard))
}

fn to_alarm_item(alarm: &Alarm) -> AlarmItem {
    AlarmItem {
        id: alarm.id().to_string(),
        name: alarm.name().to_string(),
        fire_time_from_midnight: alarm.fire_time().seconds(),
        fire_time_text: alarm
            .fire_time_as_string()
            .unwrap_or_else(|| format_clock_time(alarm.fire_time())),
        enabled: alarm.is_enabled(),
    }
}

fn to_notification_item(request: NotificationRequest) -> NotificationItem {
    NotificationItem {
        trigger_seconds_from_midnight: request.trigger_seconds_from_midnight(),
        id: request.id.to_string(),
        title: request.title,
        body: request.body,
        repeats_daily: request.repeats_daily,
    }
}
