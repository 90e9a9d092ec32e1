//! Trigger data for workflow runtime
//!
//! The payload describing the business event that started a run. It is a
//! flat, string-keyed record of scalar values; nested JSON objects are
//! flattened into dot-joined keys at the boundary so that condition fields
//! and template tokens are plain key lookups.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Errors raised while converting JSON into trigger data
#[derive(Debug, thiserror::Error)]
pub enum TriggerDataError {
    #[error("Trigger data must be a JSON object, got: {0}")]
    NotAnObject(String),

    #[error("Arrays are not supported in trigger data (field: {0})")]
    UnsupportedArray(String),

    #[error("Invalid trigger data JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single scalar value in trigger data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TriggerValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl TriggerValue {
    /// String form used by templates and `==`/`!=`/`contains` comparisons
    pub fn as_display_string(&self) -> String {
        match self {
            TriggerValue::Null => String::new(),
            TriggerValue::Bool(b) => b.to_string(),
            TriggerValue::Number(n) => format_number(n),
            TriggerValue::String(s) => s.clone(),
        }
    }

    /// Integer view, accepting numeric strings
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            TriggerValue::Number(n) => n.as_i64(),
            TriggerValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for TriggerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_display_string())
    }
}

impl From<&str> for TriggerValue {
    fn from(value: &str) -> Self {
        TriggerValue::String(value.to_string())
    }
}

impl From<String> for TriggerValue {
    fn from(value: String) -> Self {
        TriggerValue::String(value)
    }
}

impl From<bool> for TriggerValue {
    fn from(value: bool) -> Self {
        TriggerValue::Bool(value)
    }
}

impl From<i64> for TriggerValue {
    fn from(value: i64) -> Self {
        TriggerValue::Number(value.into())
    }
}

impl From<i32> for TriggerValue {
    fn from(value: i32) -> Self {
        TriggerValue::Number(value.into())
    }
}

impl From<f64> for TriggerValue {
    fn from(value: f64) -> Self {
        Number::from_f64(value)
            .map(TriggerValue::Number)
            .unwrap_or(TriggerValue::Null)
    }
}

/// Plain decimal form of a JSON number; floats never use exponent notation
pub(crate) fn format_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() => f.to_string(),
        _ => n.to_string(),
    }
}

/// Flat event payload, immutable for the lifetime of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TriggerData {
    fields: BTreeMap<String, TriggerValue>,
}

impl TriggerData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy when constructing events in code
    pub fn with(mut self, key: &str, value: impl Into<TriggerValue>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Look up a field by its (possibly dotted) key
    pub fn get(&self, key: &str) -> Option<&TriggerValue> {
        self.fields.get(key)
    }

    /// Build trigger data from a JSON object, flattening nested objects
    pub fn from_json(value: Value) -> Result<Self, TriggerDataError> {
        let Value::Object(map) = value else {
            return Err(TriggerDataError::NotAnObject(value.to_string()));
        };
        let mut data = TriggerData::new();
        flatten_into(&mut data.fields, "", map)?;
        Ok(data)
    }

    pub fn from_json_str(input: &str) -> Result<Self, TriggerDataError> {
        Self::from_json(serde_json::from_str(input)?)
    }

    /// Flat JSON object form (webhook body, execution snapshot)
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|(k, v)| {
                let value = match v {
                    TriggerValue::Null => Value::Null,
                    TriggerValue::Bool(b) => Value::Bool(*b),
                    TriggerValue::Number(n) => Value::Number(n.clone()),
                    TriggerValue::String(s) => Value::String(s.clone()),
                };
                (k.clone(), value)
            })
            .collect();
        Value::Object(map)
    }
}

fn flatten_into(
    fields: &mut BTreeMap<String, TriggerValue>,
    prefix: &str,
    map: Map<String, Value>,
) -> Result<(), TriggerDataError> {
    for (key, value) in map {
        let key = if prefix.is_empty() {
            key
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            Value::Null => {
                fields.insert(key, TriggerValue::Null);
            }
            Value::Bool(b) => {
                fields.insert(key, TriggerValue::Bool(b));
            }
            Value::Number(n) => {
                fields.insert(key, TriggerValue::Number(n));
            }
            Value::String(s) => {
                fields.insert(key, TriggerValue::String(s));
            }
            Value::Object(nested) => flatten_into(fields, &key, nested)?,
            Value::Array(_) => return Err(TriggerDataError::UnsupportedArray(key)),
        }
    }
    Ok(())
}
