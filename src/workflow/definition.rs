//! Workflow, Action, and Condition definitions
//!
//! A workflow is an ordered list of actions reacting to one trigger type.
//! Definitions are immutable during a run and loaded once per execution.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::time::Duration;

use super::template;
use super::trigger::{format_number, TriggerData};

// ============================================================================
// Workflow
// ============================================================================

/// A complete workflow definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    /// Workflow identifier (required)
    pub id: String,

    /// Human-readable name
    #[serde(default)]
    pub name: Option<String>,

    /// Event category this workflow reacts to (e.g. "ClinicCreated")
    pub trigger: String,

    /// Disabled workflows are never executed
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Actions in definition order
    #[serde(default)]
    pub actions: Vec<Action>,
}

fn default_enabled() -> bool {
    true
}

impl Workflow {
    /// Actions sorted by their `order` (list position when unset); ties keep list order
    pub fn ordered_actions(&self) -> Vec<&Action> {
        let mut actions: Vec<(i64, &Action)> = self
            .actions
            .iter()
            .enumerate()
            .map(|(idx, action)| (action.order.unwrap_or(idx as i64), action))
            .collect();
        actions.sort_by_key(|(order, _)| *order);
        actions.into_iter().map(|(_, action)| action).collect()
    }

    /// Find an action by ID
    pub fn action(&self, action_id: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.id == action_id)
    }

    /// Display name, falling back to the ID
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Structural checks applied when loading definitions
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("workflow id must not be empty".to_string());
        }
        if self.trigger.trim().is_empty() {
            return Err(format!("workflow '{}' has an empty trigger", self.id));
        }

        let mut seen = HashSet::new();
        for action in &self.actions {
            if action.id.trim().is_empty() {
                return Err(format!("workflow '{}' has an action without id", self.id));
            }
            if !seen.insert(action.id.as_str()) {
                return Err(format!(
                    "workflow '{}' has duplicate action id '{}'",
                    self.id, action.id
                ));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Action
// ============================================================================

/// A single configured step of a workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    /// Action ID, unique within its workflow
    pub id: String,

    /// Position in the workflow
    #[serde(default)]
    pub order: Option<i64>,

    /// Handler to run
    #[serde(rename = "type")]
    pub action_type: ActionType,

    /// Handler configuration (templated strings and literals)
    #[serde(default)]
    pub config: ActionConfig,

    /// Gate evaluated against trigger data
    #[serde(default)]
    pub condition: Option<Condition>,

    /// Run later through the delay scheduler
    #[serde(default, with = "super::duration::optional")]
    pub delay: Option<Duration>,
}

impl Action {
    /// Configured delay, if strictly positive
    pub fn effective_delay(&self) -> Option<Duration> {
        self.delay.filter(|d| !d.is_zero())
    }
}

/// Built-in action handlers
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionType {
    SendEmail,
    CreateNotification,
    AddTag,
    CreateTicket,
    Webhook,
    /// Anything else; fails when dispatched
    Unsupported(String),
}

impl ActionType {
    pub fn as_str(&self) -> &str {
        match self {
            ActionType::SendEmail => "send_email",
            ActionType::CreateNotification => "create_notification",
            ActionType::AddTag => "add_tag",
            ActionType::CreateTicket => "create_ticket",
            ActionType::Webhook => "webhook",
            ActionType::Unsupported(other) => other,
        }
    }
}

impl From<String> for ActionType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "send_email" => ActionType::SendEmail,
            "create_notification" => ActionType::CreateNotification,
            "add_tag" => ActionType::AddTag,
            "create_ticket" => ActionType::CreateTicket,
            "webhook" => ActionType::Webhook,
            _ => ActionType::Unsupported(value),
        }
    }
}

impl From<&str> for ActionType {
    fn from(value: &str) -> Self {
        ActionType::from(value.to_string())
    }
}

impl From<ActionType> for String {
    fn from(value: ActionType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised when an action's configuration cannot supply a value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required config: {0}")]
    Missing(String),

    #[error("Config '{0}' must be a string, number or boolean")]
    NotScalar(String),
}

/// String-keyed action configuration with typed accessors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionConfig(BTreeMap<String, Value>);

impl ActionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Resolve a config entry, rendering string templates against trigger data.
    ///
    /// Absent keys, nulls and nested values resolve to `None`. A template
    /// whose fields are missing resolves to whatever is left, possibly "".
    pub fn resolve(&self, key: &str, data: &TriggerData) -> Option<String> {
        self.0.get(key).and_then(|value| render_scalar(value, data))
    }

    /// Like [`resolve`](Self::resolve), falling back to a default value when
    /// the entry is absent or renders empty
    pub fn resolve_or(&self, key: &str, data: &TriggerData, default: &str) -> String {
        self.resolve(key, data)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    /// Resolve an entry that must be configured
    pub fn require(&self, key: &str, data: &TriggerData) -> Result<String, ConfigError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Err(ConfigError::Missing(key.to_string())),
            Some(value) => {
                render_scalar(value, data).ok_or_else(|| ConfigError::NotScalar(key.to_string()))
            }
        }
    }
}

fn render_scalar(value: &Value, data: &TriggerData) -> Option<String> {
    match value {
        Value::String(s) => Some(template::render(s, data)),
        Value::Number(n) => Some(format_number(n)),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

// ============================================================================
// Condition
// ============================================================================

/// A single field/operator/value comparison gating an action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Trigger data key (dot-joined for nested fields)
    pub field: String,

    pub operator: ComparisonOperator,

    /// Comparison value; must be a scalar
    #[serde(default)]
    pub value: Value,
}

impl Condition {
    pub fn new(field: &str, operator: &str, value: impl Into<Value>) -> Self {
        Self {
            field: field.to_string(),
            operator: ComparisonOperator::from(operator.to_string()),
            value: value.into(),
        }
    }
}

/// Comparison operators supported by conditions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Contains,
    /// Unrecognised operator; always passes
    Unknown(String),
}

impl ComparisonOperator {
    pub fn as_str(&self) -> &str {
        match self {
            ComparisonOperator::Equal => "==",
            ComparisonOperator::NotEqual => "!=",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::GreaterThanOrEqual => ">=",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::LessThanOrEqual => "<=",
            ComparisonOperator::Contains => "contains",
            ComparisonOperator::Unknown(other) => other,
        }
    }
}

impl From<String> for ComparisonOperator {
    fn from(value: String) -> Self {
        match value.trim() {
            "==" => ComparisonOperator::Equal,
            "!=" => ComparisonOperator::NotEqual,
            ">" => ComparisonOperator::GreaterThan,
            ">=" => ComparisonOperator::GreaterThanOrEqual,
            "<" => ComparisonOperator::LessThan,
            "<=" => ComparisonOperator::LessThanOrEqual,
            "contains" => ComparisonOperator::Contains,
            _ => ComparisonOperator::Unknown(value),
        }
    }
}

impl From<ComparisonOperator> for String {
    fn from(value: ComparisonOperator) -> Self {
        value.as_str().to_string()
    }
}
