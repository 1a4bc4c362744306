//! Local wall-clock helpers.
//!
//! # Responsibility
//! - Resolve "start of today" in the local time zone.
//! - Parse and format time-of-day text used by alarm entry and display.
//!
//! # Invariants
//! - Start-of-day resolution never falls back to "now"; an unresolvable local
//!   midnight is reported as an error.
//! - Parsed clock times are always valid `FireTime` offsets.

use crate::model::alarm::FireTime;
use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Number of seconds in one wall-clock day.
pub const SECONDS_PER_DAY: u32 = 86_400;

/// `strftime` pattern used for human-readable alarm times (`7:00 AM`).
pub const CLOCK_DISPLAY_FORMAT: &str = "%-I:%M %p";

static CLOCK_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(\d{1,2}):(\d{2})(?::(\d{2}))?\s*(am|pm)?\s*$")
        .expect("valid clock time regex")
});

/// Errors raised by calendar and clock-text helpers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    /// Local midnight does not exist (or is not unique) for the date.
    UnresolvableStartOfDay(NaiveDate),
    /// Input text is not a recognizable time of day.
    InvalidClockTime(String),
}

impl Display for ClockError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnresolvableStartOfDay(date) => {
                write!(f, "cannot resolve local start of day for {date}")
            }
            Self::InvalidClockTime(text) => write!(f, "invalid clock time: `{text}`"),
        }
    }
}

impl Error for ClockError {}

/// Returns the local instant of 00:00:00 on the current calendar day.
///
/// # Errors
/// - `ClockError::UnresolvableStartOfDay` when the local calendar has no
///   midnight for today.
pub fn start_of_today() -> Result<DateTime<Local>, ClockError> {
    start_of_day(Local::now().date_naive(), &Local)
}

/// Returns 00:00:00 of `date` in time zone `tz`.
///
/// When a transition makes midnight ambiguous, the earlier instant wins.
pub fn start_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Result<DateTime<Tz>, ClockError> {
    tz.from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .ok_or(ClockError::UnresolvableStartOfDay(date))
}

/// Parses `HH:MM`, `HH:MM:SS` or 12-hour `h:MM am|pm` text into a fire time.
///
/// # Errors
/// - `ClockError::InvalidClockTime` for malformed text or out-of-range fields.
pub fn parse_clock_time(text: &str) -> Result<FireTime, ClockError> {
    let invalid = || ClockError::InvalidClockTime(text.trim().to_string());
    let captures = CLOCK_TIME_RE.captures(text).ok_or_else(invalid)?;

    let hour: u32 = captures[1].parse().map_err(|_| invalid())?;
    let minute: u32 = captures[2].parse().map_err(|_| invalid())?;
    let second: u32 = match captures.get(3) {
        Some(value) => value.as_str().parse().map_err(|_| invalid())?,
        None => 0,
    };
    if minute > 59 || second > 59 {
        return Err(invalid());
    }

    let hour = match captures.get(4) {
        Some(meridiem) => {
            if !(1..=12).contains(&hour) {
                return Err(invalid());
            }
            let is_pm = meridiem.as_str().eq_ignore_ascii_case("pm");
            match (is_pm, hour) {
                (false, 12) => 0,
                (true, 12) => 12,
                (false, value) => value,
                (true, value) => value + 12,
            }
        }
        None if hour < 24 => hour,
        None => return Err(invalid()),
    };

    FireTime::from_hms(hour, minute, second).map_err(|_| invalid())
}

/// Formats an offset from midnight as display text without consulting the
/// calendar.
pub fn format_clock_time(fire_time: FireTime) -> String {
    fire_time
        .time_of_day()
        .format(CLOCK_DISPLAY_FORMAT)
        .to_string()
}
