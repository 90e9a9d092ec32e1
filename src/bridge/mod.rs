//! Bridge modules for external service communication
//!
//! The engine talks to the surrounding system only through the ports
//! defined here:
//! - `WorkflowRepository`: enabled workflow definitions
//! - `ExecutionStore`: execution and action execution records
//! - `EmailSender`, `NotificationStore`, `TagStore`, `TicketStore`: action side effects
//! - `WebhookClient`: outbound HTTP for the webhook action
//!
//! Implementations:
//! - `web`: reqwest-backed webhook client
//! - `memory`: in-process adapters used by the CLI and tests

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::engine::execution::{ActionExecution, Execution};
use crate::workflow::{Action, Workflow};

pub mod memory;
pub mod web;

pub use memory::{
    InMemoryExecutionStore, InMemoryNotificationStore, InMemoryTagStore, InMemoryTicketStore,
    InMemoryWorkflowRepository, OutboxEmailSender,
};
pub use web::ReqwestWebhookClient;

/// Common error type for port operations
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Outgoing email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// System notification to persist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNotification {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub message: String,
}

/// Support ticket to open
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTicket {
    pub subject: String,
    pub description: String,
    pub priority: String,
    pub category: String,
    pub clinic_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
}

/// Response of a webhook call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub status: u16,
    pub body: String,
    pub elapsed_ms: u64,
}

impl WebhookResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Source of workflow definitions
#[async_trait]
pub trait WorkflowRepository: Send + Sync {
    /// The workflow with its actions, if it exists and is enabled
    async fn get_enabled_workflow(&self, workflow_id: &str)
        -> Result<Option<Workflow>, BridgeError>;

    /// All enabled workflows reacting to a trigger type
    async fn get_enabled_workflows_by_trigger_type(
        &self,
        trigger_type: &str,
    ) -> Result<Vec<Workflow>, BridgeError>;

    /// A single action, regardless of its workflow's enabled flag
    async fn get_action(
        &self,
        workflow_id: &str,
        action_id: &str,
    ) -> Result<Option<Action>, BridgeError>;
}

/// Persistence for execution history.
///
/// Action executions are appended and updated individually by id, never
/// rewritten as a collection, so deferred actions of the same run can
/// record concurrently without lost updates.
#[async_trait]
pub trait ExecutionStore: Send + Sync {
    async fn insert_execution(&self, execution: &Execution) -> Result<(), BridgeError>;

    /// Persist status, completion time and error of an execution
    async fn update_execution(&self, execution: &Execution) -> Result<(), BridgeError>;

    /// Load an execution with its action executions in append order
    async fn get_execution(&self, execution_id: Uuid) -> Result<Option<Execution>, BridgeError>;

    async fn append_action_execution(
        &self,
        action_execution: &ActionExecution,
    ) -> Result<(), BridgeError>;

    async fn update_action_execution(
        &self,
        action_execution: &ActionExecution,
    ) -> Result<(), BridgeError>;
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), BridgeError>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn create(&self, notification: &NewNotification) -> Result<(), BridgeError>;
}

#[async_trait]
pub trait TagStore: Send + Sync {
    async fn find_or_create_tag(&self, name: &str) -> Result<Tag, BridgeError>;

    /// Returns true when a new association was created
    async fn find_or_create_association(
        &self,
        tag_id: Uuid,
        clinic_id: i64,
    ) -> Result<bool, BridgeError>;
}

#[async_trait]
pub trait TicketStore: Send + Sync {
    async fn create(&self, ticket: &NewTicket) -> Result<(), BridgeError>;
}

#[async_trait]
pub trait WebhookClient: Send + Sync {
    async fn post_json(&self, url: &str, body: &Value) -> Result<WebhookResponse, BridgeError>;
}
