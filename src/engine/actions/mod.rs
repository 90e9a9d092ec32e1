//! Built-in action handlers
//!
//! Each submodule executes one action type against its port. Config values
//! are resolved through the template engine before use.

pub mod email;
pub mod notification;
pub mod tag;
pub mod ticket;
pub mod webhook;

use crate::workflow::{ActionConfig, TriggerData};

/// Clinic targeted by an action.
///
/// Uses the `clinicId` config entry when present (it may be templated),
/// otherwise the `clinicId` trigger field. An entry that renders empty falls
/// back to the trigger field. Non-integer values do not resolve.
pub fn resolve_clinic_id(config: &ActionConfig, data: &TriggerData) -> Option<i64> {
    match config.resolve("clinicId", data).filter(|v| !v.trim().is_empty()) {
        Some(value) => value.trim().parse().ok(),
        None => data.get("clinicId").and_then(|v| v.as_i64()),
    }
}
