//! Flutter-facing bindings for the alarm core.

pub mod api;
