//! Workflow types and definitions
//!
//! This module contains the definition side of the engine:
//! - `definition` - Workflow, Action, ActionType, ActionConfig, Condition
//! - `trigger` - TriggerData, the flat event payload
//! - `condition` - Condition evaluation (fail-open)
//! - `template` - `{{ field }}` substitution
//! - `duration` - Delay parsing ("1h30m")
//! - `loader` - Load workflows from files and directories
//! - `config` - Engine configuration (engine.yaml)

pub mod condition;
pub mod config;
pub mod definition;
pub mod duration;
pub mod loader;
pub mod template;
pub mod trigger;

// Re-export all public types for convenience
pub use condition::{evaluate as evaluate_condition, try_evaluate, ConditionError};
pub use config::{ActionDefaults, EngineConfig, SchedulerConfig, WebhookConfig};
pub use definition::{
    Action, ActionConfig, ActionType, ComparisonOperator, Condition, ConfigError, Workflow,
};
pub use duration::{parse_duration, DurationError};
pub use loader::{LoadError, WorkflowLoader};
pub use template::render;
pub use trigger::{TriggerData, TriggerDataError, TriggerValue};
