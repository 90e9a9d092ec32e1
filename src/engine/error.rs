//! Engine error types
//!
//! Two tiers:
//! - `ActionError`: one action failed. Recorded on its action execution and
//!   never propagated past it.
//! - `ExecutionError`: the orchestration loop itself failed (persistence,
//!   scheduling, missing records). This is the only kind that fails a run.

use uuid::Uuid;

use crate::bridge::BridgeError;
use crate::workflow::ConfigError;

/// Errors raised while executing a single action
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("Unsupported action type: {0}")]
    UnsupportedActionType(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid config '{key}': {reason}")]
    InvalidConfig { key: String, reason: String },

    #[error("Webhook {url} responded with HTTP {status}")]
    WebhookStatus { url: String, status: u16 },

    #[error("{0}")]
    Bridge(#[from] BridgeError),
}

/// Errors that escape the orchestration loop
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("Execution persistence error: {0}")]
    Persistence(BridgeError),

    #[error("Workflow repository error: {0}")]
    Repository(BridgeError),

    #[error("Failed to schedule delayed action: {0}")]
    Scheduling(BridgeError),

    #[error("Execution not found: {0}")]
    ExecutionNotFound(Uuid),

    #[error("Action '{action_id}' not found in workflow '{workflow_id}'")]
    ActionNotFound {
        workflow_id: String,
        action_id: String,
    },

    #[error("Execution {0} is already finalized")]
    AlreadyFinalized(Uuid),

    #[error("Action execution {0} not found")]
    ActionExecutionNotFound(Uuid),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
