//! Workflow Orchestrator - Runs workflows and tracks their executions
//!
//! For each run it:
//! 1. Loads the enabled workflow (missing or disabled: no execution)
//! 2. Starts an execution with a trigger data snapshot
//! 3. Walks the actions in order: skips failed conditions, defers delayed
//!    actions to the scheduler, and runs the rest with tracking
//! 4. Finalizes the execution
//!
//! A failing action never stops the run; it is recorded as Failed and the
//! next action runs. Only failures of the loop itself (persistence,
//! scheduling) mark the execution Failed. An execution is Completed as soon
//! as the synchronous pass ends, even while delayed actions are pending.

use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::bridge::{ExecutionStore, WorkflowRepository};
use crate::engine::dispatcher::ActionDispatcher;
use crate::engine::error::ExecutionError;
use crate::engine::execution::{ActionExecution, Execution};
use crate::engine::scheduler::{DeferredAction, DelayScheduler};
use crate::engine::tracker::ExecutionTracker;
use crate::workflow::{evaluate_condition, Action, TriggerData, Workflow};

pub struct Orchestrator {
    repository: Arc<dyn WorkflowRepository>,
    tracker: ExecutionTracker,
    dispatcher: ActionDispatcher,
    scheduler: Arc<dyn DelayScheduler>,
}

impl Orchestrator {
    pub fn new(
        repository: Arc<dyn WorkflowRepository>,
        store: Arc<dyn ExecutionStore>,
        dispatcher: ActionDispatcher,
        scheduler: Arc<dyn DelayScheduler>,
    ) -> Self {
        Self {
            repository,
            tracker: ExecutionTracker::new(store),
            dispatcher,
            scheduler,
        }
    }

    /// Run a workflow for one trigger occurrence.
    ///
    /// Returns `Ok(None)` when the workflow does not exist or is disabled.
    #[instrument(skip(self, trigger_data))]
    pub async fn execute(
        &self,
        workflow_id: &str,
        trigger_data: &TriggerData,
    ) -> Result<Option<Execution>, ExecutionError> {
        let workflow = self
            .repository
            .get_enabled_workflow(workflow_id)
            .await
            .map_err(ExecutionError::Repository)?;

        let Some(workflow) = workflow else {
            info!("Workflow not found or disabled, nothing to run");
            return Ok(None);
        };

        let mut execution = self
            .tracker
            .begin_execution(&workflow.id, trigger_data)
            .await?;
        info!(
            execution_id = %execution.id,
            "Starting workflow: {} ({} actions)",
            workflow.display_name(),
            workflow.actions.len()
        );

        let error = match self.run_actions(&workflow, &mut execution, trigger_data).await {
            Ok(()) => None,
            Err(e) => {
                error!(execution_id = %execution.id, error = %e, "Workflow execution failed");
                Some(e.to_string())
            }
        };

        self.tracker.finalize_execution(&mut execution, error).await?;
        info!(
            execution_id = %execution.id,
            status = %execution.status,
            actions = execution.action_executions.len(),
            "Workflow finished"
        );

        Ok(Some(execution))
    }

    /// Run a previously deferred action against its existing execution.
    ///
    /// Appends a new action execution; the execution's own status is left
    /// untouched.
    #[instrument(skip(self, job), fields(action_id = %job.action_id, execution_id = %job.execution_id))]
    pub async fn execute_deferred_action(
        &self,
        job: &DeferredAction,
    ) -> Result<ActionExecution, ExecutionError> {
        let mut execution = self.tracker.load_execution(job.execution_id).await?;

        let action = self
            .repository
            .get_action(&execution.workflow_id, &job.action_id)
            .await
            .map_err(ExecutionError::Repository)?
            .ok_or_else(|| ExecutionError::ActionNotFound {
                workflow_id: execution.workflow_id.clone(),
                action_id: job.action_id.clone(),
            })?;

        let id = self
            .execute_tracked(&mut execution, &action, &job.trigger_data)
            .await?;

        execution
            .action_execution(id)
            .cloned()
            .ok_or(ExecutionError::ActionExecutionNotFound(id))
    }

    async fn run_actions(
        &self,
        workflow: &Workflow,
        execution: &mut Execution,
        trigger_data: &TriggerData,
    ) -> Result<(), ExecutionError> {
        for action in workflow.ordered_actions() {
            if !evaluate_condition(action.condition.as_ref(), trigger_data) {
                info!(action_id = %action.id, "Skipping action due to condition");
                continue;
            }

            if let Some(delay) = action.effective_delay() {
                let job = DeferredAction {
                    action_id: action.id.clone(),
                    execution_id: execution.id,
                    trigger_data: trigger_data.clone(),
                };
                self.scheduler
                    .schedule(job, delay)
                    .await
                    .map_err(ExecutionError::Scheduling)?;
                info!(action_id = %action.id, delay = ?delay, "Action scheduled");
                continue;
            }

            self.execute_tracked(execution, action, trigger_data).await?;
        }

        Ok(())
    }

    /// Dispatch one action inside an action execution record
    async fn execute_tracked(
        &self,
        execution: &mut Execution,
        action: &Action,
        trigger_data: &TriggerData,
    ) -> Result<Uuid, ExecutionError> {
        let id = self.tracker.begin_action(execution, action).await?;
        debug!(action_id = %action.id, action_type = %action.action_type, "Executing action");

        let error = match self
            .dispatcher
            .dispatch(&action.action_type, &action.config, trigger_data)
            .await
        {
            Ok(()) => {
                info!(action_id = %action.id, "Action completed");
                None
            }
            Err(e) => {
                warn!(action_id = %action.id, error = %e, "Action failed");
                Some(e.to_string())
            }
        };

        self.tracker.complete_action(execution, id, error).await?;
        Ok(id)
    }
}
