//! Event publisher - Fans a trigger out to every matching workflow

use std::sync::Arc;
use tracing::{error, info, instrument};

use super::error::ExecutionError;
use super::execution::Execution;
use super::orchestrator::Orchestrator;
use crate::bridge::WorkflowRepository;
use crate::workflow::TriggerData;

pub struct EventPublisher {
    repository: Arc<dyn WorkflowRepository>,
    orchestrator: Arc<Orchestrator>,
}

impl EventPublisher {
    pub fn new(repository: Arc<dyn WorkflowRepository>, orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            repository,
            orchestrator,
        }
    }

    /// Run every enabled workflow for `trigger_type`, one after another.
    ///
    /// A workflow whose run fails with an infrastructure error is logged and
    /// left out of the result; the others still run.
    #[instrument(skip(self, trigger_data))]
    pub async fn publish(
        &self,
        trigger_type: &str,
        trigger_data: &TriggerData,
    ) -> Result<Vec<Execution>, ExecutionError> {
        let workflows = self
            .repository
            .get_enabled_workflows_by_trigger_type(trigger_type)
            .await
            .map_err(ExecutionError::Repository)?;
        info!("{} workflow(s) match trigger {}", workflows.len(), trigger_type);

        let mut executions = Vec::with_capacity(workflows.len());
        for workflow in workflows {
            match self.orchestrator.execute(&workflow.id, trigger_data).await {
                Ok(Some(execution)) => executions.push(execution),
                Ok(None) => info!(workflow_id = %workflow.id, "Workflow disabled before it ran"),
                Err(e) => error!(workflow_id = %workflow.id, error = %e, "Workflow run failed"),
            }
        }

        Ok(executions)
    }
}
