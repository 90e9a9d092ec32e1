//! Engine configuration
//!
//! Loaded from an optional `engine.yaml`; every field has a default.
//!
//! ```yaml
//! webhook:
//!   timeout_ms: 10000
//!   user_agent: "workflow-automation/0.1"
//!
//! defaults:
//!   notification_type: info
//!   ticket_priority: normal
//!   ticket_category: general
//!
//! scheduler:
//!   channel_capacity: 256
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::loader::LoadError;

/// Outbound webhook settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Upper bound for a single webhook call
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_user_agent() -> String {
    format!("workflow-automation/{}", env!("CARGO_PKG_VERSION"))
}

impl WebhookConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

/// Fallback values for optional action config entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDefaults {
    #[serde(default = "default_notification_type")]
    pub notification_type: String,

    #[serde(default = "default_ticket_priority")]
    pub ticket_priority: String,

    #[serde(default = "default_ticket_category")]
    pub ticket_category: String,
}

fn default_notification_type() -> String {
    "info".to_string()
}

fn default_ticket_priority() -> String {
    "normal".to_string()
}

fn default_ticket_category() -> String {
    "general".to_string()
}

impl Default for ActionDefaults {
    fn default() -> Self {
        Self {
            notification_type: default_notification_type(),
            ticket_priority: default_ticket_priority(),
            ticket_category: default_ticket_category(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_channel_capacity() -> usize {
    256
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub webhook: WebhookConfig,

    #[serde(default)]
    pub defaults: ActionDefaults,

    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

impl EngineConfig {
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_yaml::from_str(&content).map_err(|e| LoadError::Yaml {
            file: path.display().to_string(),
            error: e,
        })?;
        Ok(config)
    }
}
