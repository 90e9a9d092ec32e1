//! Execution record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Status of an execution or action execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Running,
    Completed,
    Failed,
}

impl ExecutionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ExecutionStatus::Running)
    }

    fn from_error(error: &Option<String>) -> Self {
        if error.is_some() {
            ExecutionStatus::Failed
        } else {
            ExecutionStatus::Completed
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExecutionStatus::Running => "running",
            ExecutionStatus::Completed => "completed",
            ExecutionStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// One runtime instance of a workflow for one trigger occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    pub id: Uuid,
    pub workflow_id: String,
    pub status: ExecutionStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Serialized trigger data taken when the run started
    pub trigger_snapshot: String,
    pub error: Option<String>,
    pub action_executions: Vec<ActionExecution>,
}

impl Execution {
    pub fn start(workflow_id: &str, trigger_snapshot: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            workflow_id: workflow_id.to_string(),
            status: ExecutionStatus::Running,
            started_at: Utc::now(),
            completed_at: None,
            trigger_snapshot,
            error: None,
            action_executions: Vec::new(),
        }
    }

    /// Move to a terminal state; returns false if already terminal
    pub fn finish(&mut self, error: Option<String>) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = ExecutionStatus::from_error(&error);
        self.error = error;
        self.completed_at = Some(Utc::now());
        true
    }

    pub fn action_execution(&self, id: Uuid) -> Option<&ActionExecution> {
        self.action_executions.iter().find(|a| a.id == id)
    }

    pub fn action_execution_mut(&mut self, id: Uuid) -> Option<&mut ActionExecution> {
        self.action_executions.iter_mut().find(|a| a.id == id)
    }

    /// True when every recorded action completed
    pub fn all_actions_succeeded(&self) -> bool {
        self.action_executions
            .iter()
            .all(|a| a.status == ExecutionStatus::Completed)
    }

    pub fn failed_actions(&self) -> impl Iterator<Item = &ActionExecution> {
        self.action_executions
            .iter()
            .filter(|a| a.status == ExecutionStatus::Failed)
    }
}

/// Record of one attempted action within an execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionExecution {
    pub id: Uuid,
    pub execution_id: Uuid,
    pub action_id: String,
    pub status: ExecutionStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl ActionExecution {
    pub fn start(execution_id: Uuid, action_id: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            execution_id,
            action_id: action_id.to_string(),
            status: ExecutionStatus::Running,
            started_at: Utc::now(),
            completed_at: None,
            error: None,
        }
    }

    /// Move to a terminal state; returns false if already terminal
    pub fn finish(&mut self, error: Option<String>) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = ExecutionStatus::from_error(&error);
        self.error = error;
        self.completed_at = Some(Utc::now());
        true
    }
}
