//! Execution Tracker - Records run and per-action status
//!
//! Every mutation is persisted immediately so a run is observable while it
//! is still in progress, including by deferred actions that append to the
//! same execution later.

use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::bridge::ExecutionStore;
use crate::engine::error::ExecutionError;
use crate::engine::execution::{ActionExecution, Execution};
use crate::workflow::{Action, TriggerData};

#[derive(Clone)]
pub struct ExecutionTracker {
    store: Arc<dyn ExecutionStore>,
}

impl ExecutionTracker {
    pub fn new(store: Arc<dyn ExecutionStore>) -> Self {
        Self { store }
    }

    /// Create a running execution with a snapshot of the trigger data
    pub async fn begin_execution(
        &self,
        workflow_id: &str,
        trigger_data: &TriggerData,
    ) -> Result<Execution, ExecutionError> {
        let snapshot = serde_json::to_string(&trigger_data.to_json())?;
        let execution = Execution::start(workflow_id, snapshot);
        self.store
            .insert_execution(&execution)
            .await
            .map_err(ExecutionError::Persistence)?;
        debug!(execution_id = %execution.id, "Execution started");
        Ok(execution)
    }

    /// Load a previously started execution
    pub async fn load_execution(&self, execution_id: Uuid) -> Result<Execution, ExecutionError> {
        self.store
            .get_execution(execution_id)
            .await
            .map_err(ExecutionError::Persistence)?
            .ok_or(ExecutionError::ExecutionNotFound(execution_id))
    }

    /// Append a running action execution; returns its ID
    pub async fn begin_action(
        &self,
        execution: &mut Execution,
        action: &Action,
    ) -> Result<Uuid, ExecutionError> {
        let action_execution = ActionExecution::start(execution.id, &action.id);
        self.store
            .append_action_execution(&action_execution)
            .await
            .map_err(ExecutionError::Persistence)?;
        let id = action_execution.id;
        execution.action_executions.push(action_execution);
        Ok(id)
    }

    /// Mark an action execution Completed, or Failed when `error` is set
    pub async fn complete_action(
        &self,
        execution: &mut Execution,
        action_execution_id: Uuid,
        error: Option<String>,
    ) -> Result<(), ExecutionError> {
        let action_execution = execution
            .action_execution_mut(action_execution_id)
            .ok_or(ExecutionError::ActionExecutionNotFound(action_execution_id))?;
        action_execution.finish(error);
        self.store
            .update_action_execution(action_execution)
            .await
            .map_err(ExecutionError::Persistence)
    }

    /// Move the execution to Completed, or Failed when `error` is set
    pub async fn finalize_execution(
        &self,
        execution: &mut Execution,
        error: Option<String>,
    ) -> Result<(), ExecutionError> {
        if !execution.finish(error) {
            return Err(ExecutionError::AlreadyFinalized(execution.id));
        }
        self.store
            .update_execution(execution)
            .await
            .map_err(ExecutionError::Persistence)
    }
}
