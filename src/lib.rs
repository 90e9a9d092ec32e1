//! # Workflow Automation
//!
//! An event-triggered workflow automation engine. Given a business event
//! (a trigger) and a stored workflow definition, it runs an ordered list of
//! conditionally-gated, optionally-delayed actions and records an auditable
//! execution history.
//!
//! ## Features
//!
//! - **Declarative YAML workflows** - Actions with `{{ field }}` templated config
//! - **Conditions** - One flat comparison per action, evaluated fail-open
//! - **Delayed actions** - Handed to a scheduler and run later on the same execution
//! - **Failure isolation** - A failing action never stops the actions after it
//! - **Execution tracking** - Every run and action attempt is persisted as it happens
//!
//! ## Actions
//!
//! - **send_email**: `to`, `subject`, `body`
//! - **create_notification**: `title`, `message`, optional `type`
//! - **add_tag**: `tagName`, tags the clinic from `clinicId`
//! - **create_ticket**: `subject`, optional `priority` and `category`
//! - **webhook**: `url`, POSTs the trigger data as JSON
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use workflow_automation::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let workflow = WorkflowLoader::parse(r#"
//! id: welcome-clinic
//! trigger: ClinicCreated
//! actions:
//!   - id: welcome-email
//!     type: send_email
//!     config:
//!       to: "{{ownerEmail}}"
//!       subject: "Welcome!"
//!       body: "Clinic {{clinicId}} is ready"
//! "#, "inline")?;
//!
//!     let config = EngineConfig::default();
//!     let ports = ActionPorts {
//!         email: Arc::new(OutboxEmailSender::new()),
//!         notifications: Arc::new(InMemoryNotificationStore::new()),
//!         tags: Arc::new(InMemoryTagStore::new()),
//!         tickets: Arc::new(InMemoryTicketStore::new()),
//!         webhooks: Arc::new(ReqwestWebhookClient::new(&config.webhook)?),
//!     };
//!     let (scheduler, worker) = TokioDelayScheduler::new(config.scheduler.channel_capacity);
//!
//!     let orchestrator = Arc::new(Orchestrator::new(
//!         Arc::new(InMemoryWorkflowRepository::new(vec![workflow])),
//!         Arc::new(InMemoryExecutionStore::new()),
//!         ActionDispatcher::new(ports).with_defaults(config.defaults.clone()),
//!         Arc::new(scheduler),
//!     ));
//!     tokio::spawn(worker.run(orchestrator.clone()));
//!
//!     let data = TriggerData::new().with("clinicId", 42).with("ownerEmail", "a@b.com");
//!     if let Some(execution) = orchestrator.execute("welcome-clinic", &data).await? {
//!         println!("status={} actions={}", execution.status, execution.action_executions.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod bridge;
pub mod engine;
pub mod workflow;

// Re-export main types
pub use bridge::{
    BridgeError, EmailMessage, EmailSender, ExecutionStore, InMemoryExecutionStore,
    InMemoryNotificationStore, InMemoryTagStore, InMemoryTicketStore, InMemoryWorkflowRepository,
    NewNotification, NewTicket, NotificationStore, OutboxEmailSender, ReqwestWebhookClient, Tag,
    TagStore, TicketStore, WebhookClient, WebhookResponse, WorkflowRepository,
};
pub use engine::{
    ActionDispatcher, ActionError, ActionExecution, ActionPorts, DeferredAction,
    DeferredActionWorker, DelayScheduler, EventPublisher, Execution, ExecutionError,
    ExecutionStatus, ExecutionTracker, Orchestrator, TokioDelayScheduler,
};
pub use workflow::{
    Action, ActionConfig, ActionType, ComparisonOperator, Condition, ConfigError, EngineConfig,
    LoadError, TriggerData, TriggerDataError, TriggerValue, Workflow, WorkflowLoader,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bridge::{
        InMemoryExecutionStore, InMemoryNotificationStore, InMemoryTagStore, InMemoryTicketStore,
        InMemoryWorkflowRepository, OutboxEmailSender, ReqwestWebhookClient,
    };
    pub use crate::engine::{
        ActionDispatcher, ActionPorts, DeferredAction, EventPublisher, Execution,
        ExecutionStatus, Orchestrator, TokioDelayScheduler,
    };
    pub use crate::workflow::{
        EngineConfig, LoadError, TriggerData, Workflow, WorkflowLoader,
    };
}
