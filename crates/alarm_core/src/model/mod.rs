//! Domain model for daily alarms.
//!
//! # Responsibility
//! - Define the canonical alarm record shared by controller, stores and
//!   notification adapters.
//!
//! # Invariants
//! - Every alarm is identified by a stable `AlarmId`.
//! - Only stored fields are serialized; fire dates are always derived.

pub mod alarm;
