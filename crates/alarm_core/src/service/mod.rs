//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate scheduler and store calls into alarm use cases.
//! - Keep UI/FFI layers decoupled from notification and storage details.

pub mod alarm_controller;
