//! Variable substitution for `{{ field }}` placeholders
//!
//! Supports:
//! - `{{field}}` and `{{ field }}` for top-level trigger fields
//! - `{{owner.email}}` for fields flattened from nested objects
//!
//! This is a flat micro-template: replacement values are never re-scanned,
//! there is no escaping, and missing fields render as an empty string.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use super::trigger::TriggerData;

static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([^{}]+?)\s*\}\}").unwrap());

/// Render a template against trigger data
pub fn render(template: &str, data: &TriggerData) -> String {
    PLACEHOLDER_REGEX
        .replace_all(template, |caps: &Captures| {
            data.get(&caps[1])
                .map(|value| value.as_display_string())
                .unwrap_or_default()
        })
        .into_owned()
}
