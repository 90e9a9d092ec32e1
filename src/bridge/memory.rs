//! In-memory port adapters
//!
//! Used by the CLI and by tests. State lives behind `tokio::sync::RwLock`
//! and every adapter is cheap to clone (clones share state).

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::{
    BridgeError, EmailMessage, EmailSender, ExecutionStore, NewNotification, NewTicket,
    NotificationStore, Tag, TagStore, TicketStore, WorkflowRepository,
};
use crate::engine::execution::{ActionExecution, Execution};
use crate::workflow::{Action, Workflow};

// ============================================================================
// Workflows
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkflowRepository {
    workflows: Arc<RwLock<Vec<Workflow>>>,
}

impl InMemoryWorkflowRepository {
    pub fn new(workflows: Vec<Workflow>) -> Self {
        Self {
            workflows: Arc::new(RwLock::new(workflows)),
        }
    }
}

#[async_trait]
impl WorkflowRepository for InMemoryWorkflowRepository {
    async fn get_enabled_workflow(
        &self,
        workflow_id: &str,
    ) -> Result<Option<Workflow>, BridgeError> {
        let workflows = self.workflows.read().await;
        Ok(workflows
            .iter()
            .find(|w| w.id == workflow_id && w.enabled)
            .cloned())
    }

    async fn get_enabled_workflows_by_trigger_type(
        &self,
        trigger_type: &str,
    ) -> Result<Vec<Workflow>, BridgeError> {
        let workflows = self.workflows.read().await;
        Ok(workflows
            .iter()
            .filter(|w| w.enabled && w.trigger == trigger_type)
            .cloned()
            .collect())
    }

    async fn get_action(
        &self,
        workflow_id: &str,
        action_id: &str,
    ) -> Result<Option<Action>, BridgeError> {
        let workflows = self.workflows.read().await;
        Ok(workflows
            .iter()
            .find(|w| w.id == workflow_id)
            .and_then(|w| w.action(action_id))
            .cloned())
    }
}

// ============================================================================
// Executions
// ============================================================================

#[derive(Debug, Default)]
struct ExecutionTables {
    executions: HashMap<Uuid, Execution>,
    /// Append-only action execution log, in insertion order
    action_executions: Vec<ActionExecution>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryExecutionStore {
    tables: Arc<RwLock<ExecutionTables>>,
}

impl InMemoryExecutionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn execution_count(&self) -> usize {
        self.tables.read().await.executions.len()
    }

    pub async fn action_execution_count(&self) -> usize {
        self.tables.read().await.action_executions.len()
    }
}

#[async_trait]
impl ExecutionStore for InMemoryExecutionStore {
    async fn insert_execution(&self, execution: &Execution) -> Result<(), BridgeError> {
        let mut tables = self.tables.write().await;
        if tables.executions.contains_key(&execution.id) {
            return Err(BridgeError::Storage(format!(
                "execution {} already exists",
                execution.id
            )));
        }
        let mut row = execution.clone();
        row.action_executions.clear();
        tables.executions.insert(execution.id, row);
        Ok(())
    }

    async fn update_execution(&self, execution: &Execution) -> Result<(), BridgeError> {
        let mut tables = self.tables.write().await;
        let row = tables.executions.get_mut(&execution.id).ok_or_else(|| {
            BridgeError::Storage(format!("execution {} not found", execution.id))
        })?;
        row.status = execution.status;
        row.completed_at = execution.completed_at;
        row.error = execution.error.clone();
        Ok(())
    }

    async fn get_execution(&self, execution_id: Uuid) -> Result<Option<Execution>, BridgeError> {
        let tables = self.tables.read().await;
        Ok(tables.executions.get(&execution_id).map(|row| {
            let mut execution = row.clone();
            execution.action_executions = tables
                .action_executions
                .iter()
                .filter(|a| a.execution_id == execution_id)
                .cloned()
                .collect();
            execution
        }))
    }

    async fn append_action_execution(
        &self,
        action_execution: &ActionExecution,
    ) -> Result<(), BridgeError> {
        let mut tables = self.tables.write().await;
        if !tables
            .executions
            .contains_key(&action_execution.execution_id)
        {
            return Err(BridgeError::Storage(format!(
                "execution {} not found",
                action_execution.execution_id
            )));
        }
        tables.action_executions.push(action_execution.clone());
        Ok(())
    }

    async fn update_action_execution(
        &self,
        action_execution: &ActionExecution,
    ) -> Result<(), BridgeError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .action_executions
            .iter_mut()
            .find(|a| a.id == action_execution.id)
            .ok_or_else(|| {
                BridgeError::Storage(format!(
                    "action execution {} not found",
                    action_execution.id
                ))
            })?;
        *row = action_execution.clone();
        Ok(())
    }
}

// ============================================================================
// Action side effects
// ============================================================================

/// Email sender that keeps sent messages in an outbox
#[derive(Debug, Clone, Default)]
pub struct OutboxEmailSender {
    outbox: Arc<RwLock<Vec<EmailMessage>>>,
}

impl OutboxEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<EmailMessage> {
        self.outbox.read().await.clone()
    }
}

#[async_trait]
impl EmailSender for OutboxEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), BridgeError> {
        info!(to = %message.to, subject = %message.subject, "Email queued in outbox");
        self.outbox.write().await.push(message.clone());
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationStore {
    notifications: Arc<RwLock<Vec<NewNotification>>>,
}

impl InMemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<NewNotification> {
        self.notifications.read().await.clone()
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn create(&self, notification: &NewNotification) -> Result<(), BridgeError> {
        self.notifications.write().await.push(notification.clone());
        Ok(())
    }
}

#[derive(Debug, Default)]
struct TagTables {
    tags: Vec<Tag>,
    associations: Vec<(Uuid, i64)>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryTagStore {
    tables: Arc<RwLock<TagTables>>,
}

impl InMemoryTagStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn tags(&self) -> Vec<Tag> {
        self.tables.read().await.tags.clone()
    }

    /// Tag names associated with a clinic
    pub async fn tags_for_clinic(&self, clinic_id: i64) -> Vec<String> {
        let tables = self.tables.read().await;
        tables
            .associations
            .iter()
            .filter(|(_, clinic)| *clinic == clinic_id)
            .filter_map(|(tag_id, _)| tables.tags.iter().find(|t| t.id == *tag_id))
            .map(|t| t.name.clone())
            .collect()
    }
}

#[async_trait]
impl TagStore for InMemoryTagStore {
    async fn find_or_create_tag(&self, name: &str) -> Result<Tag, BridgeError> {
        let mut tables = self.tables.write().await;
        if let Some(tag) = tables.tags.iter().find(|t| t.name == name) {
            return Ok(tag.clone());
        }
        let tag = Tag {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        tables.tags.push(tag.clone());
        Ok(tag)
    }

    async fn find_or_create_association(
        &self,
        tag_id: Uuid,
        clinic_id: i64,
    ) -> Result<bool, BridgeError> {
        let mut tables = self.tables.write().await;
        if tables.associations.contains(&(tag_id, clinic_id)) {
            return Ok(false);
        }
        tables.associations.push((tag_id, clinic_id));
        Ok(true)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryTicketStore {
    tickets: Arc<RwLock<Vec<NewTicket>>>,
}

impl InMemoryTicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<NewTicket> {
        self.tickets.read().await.clone()
    }
}

#[async_trait]
impl TicketStore for InMemoryTicketStore {
    async fn create(&self, ticket: &NewTicket) -> Result<(), BridgeError> {
        self.tickets.write().await.push(ticket.clone());
        Ok(())
    }
}
