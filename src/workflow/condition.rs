//! Condition evaluation against trigger data
//!
//! Semantics:
//! - no condition: the action runs
//! - `==` / `!=`: compare string forms (a missing field compares as "")
//! - `>` `>=` `<` `<=`: decimal comparison (f64 beyond decimal range); false
//!   unless both sides are numbers
//! - `contains`: case-insensitive substring; false for a missing field
//! - unknown operator: passes
//!
//! Evaluation is fail-open. A malformed condition is logged and treated as
//! satisfied so the workflow keeps making progress; [`try_evaluate`] exposes
//! the error for callers that want to decide differently.

use rust_decimal::Decimal;
use serde_json::Value;
use std::cmp::Ordering;
use std::str::FromStr;
use tracing::{debug, warn};

use super::definition::{ComparisonOperator, Condition};
use super::trigger::{format_number, TriggerData};

/// Errors that make a condition impossible to evaluate
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConditionError {
    #[error("Condition field is empty")]
    EmptyField,

    #[error("Condition value for field '{field}' must be a scalar, got: {value}")]
    NonScalarValue { field: String, value: String },
}

/// Evaluate an optional condition, failing open on errors
pub fn evaluate(condition: Option<&Condition>, data: &TriggerData) -> bool {
    let Some(condition) = condition else {
        return true;
    };

    match try_evaluate(condition, data) {
        Ok(passed) => passed,
        Err(e) => {
            warn!(
                field = %condition.field,
                operator = %condition.operator.as_str(),
                error = %e,
                "Condition evaluation failed, treating as satisfied"
            );
            true
        }
    }
}

/// Evaluate a condition, surfacing malformed conditions as errors
pub fn try_evaluate(condition: &Condition, data: &TriggerData) -> Result<bool, ConditionError> {
    let field = condition.field.trim();
    if field.is_empty() {
        return Err(ConditionError::EmptyField);
    }

    let expected = scalar_string(&condition.value).ok_or_else(|| {
        ConditionError::NonScalarValue {
            field: field.to_string(),
            value: condition.value.to_string(),
        }
    })?;
    let actual = data.get(field).map(|v| v.as_display_string());

    let result = match &condition.operator {
        ComparisonOperator::Equal => actual.unwrap_or_default() == expected,
        ComparisonOperator::NotEqual => actual.unwrap_or_default() != expected,
        ComparisonOperator::GreaterThan => {
            compare_decimal(actual.as_deref(), &expected, |o| o == Ordering::Greater)
        }
        ComparisonOperator::GreaterThanOrEqual => {
            compare_decimal(actual.as_deref(), &expected, |o| o != Ordering::Less)
        }
        ComparisonOperator::LessThan => {
            compare_decimal(actual.as_deref(), &expected, |o| o == Ordering::Less)
        }
        ComparisonOperator::LessThanOrEqual => {
            compare_decimal(actual.as_deref(), &expected, |o| o != Ordering::Greater)
        }
        ComparisonOperator::Contains => actual
            .map(|a| a.to_lowercase().contains(&expected.to_lowercase()))
            .unwrap_or(false),
        ComparisonOperator::Unknown(op) => {
            debug!(operator = %op, field = %field, "Unknown condition operator, passing");
            true
        }
    };

    Ok(result)
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(format_number(n)),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

fn parse_float(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|f| f.is_finite())
}

fn compare_numbers(actual: &str, expected: &str) -> Option<Ordering> {
    let (actual, expected) = (actual.trim(), expected.trim());
    match (parse_decimal(actual), parse_decimal(expected)) {
        (Some(left), Some(right)) => Some(left.cmp(&right)),
        _ => parse_float(actual)?.partial_cmp(&parse_float(expected)?),
    }
}

fn compare_decimal(actual: Option<&str>, expected: &str, accept: impl Fn(Ordering) -> bool) -> bool {
    actual
        .and_then(|actual| compare_numbers(actual, expected))
        .map(accept)
        .unwrap_or(false)
}
