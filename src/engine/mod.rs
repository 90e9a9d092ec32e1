//! Workflow execution engine module
//!
//! This module contains:
//! - `orchestrator` - Runs workflows and deferred actions
//! - `dispatcher` - Routes actions to their handlers
//! - `actions` - Built-in action handlers
//! - `tracker` - Persists execution and action execution records
//! - `execution` - Execution record types
//! - `scheduler` - Delay scheduler port and tokio implementation
//! - `publisher` - Fan-out of one trigger to all matching workflows
//! - `error` - Engine error types

pub mod actions;
pub mod dispatcher;
pub mod error;
pub mod execution;
pub mod orchestrator;
pub mod publisher;
pub mod scheduler;
pub mod tracker;

pub use dispatcher::{ActionDispatcher, ActionPorts};
pub use error::{ActionError, ExecutionError};
pub use execution::{ActionExecution, Execution, ExecutionStatus};
pub use orchestrator::Orchestrator;
pub use publisher::EventPublisher;
pub use scheduler::{DeferredAction, DeferredActionWorker, DelayScheduler, TokioDelayScheduler};
pub use tracker::ExecutionTracker;
