#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use uuid::Uuid;
use workflow_automation::bridge::memory::*;
use workflow_automation::engine::execution::{ActionExecution, Execution};
use workflow_automation::{
    ActionDispatcher, ActionPorts, BridgeError, DeferredAction, DelayScheduler, ExecutionStore,
    Orchestrator, WebhookClient, WebhookResponse, Workflow, WorkflowLoader,
};

pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

pub fn write_workflow(dir: &Path, filename: &str, content: &str) {
    fs::write(dir.join(filename), content).expect("Failed to write workflow file");
}

pub fn write_engine_config(dir: &Path, content: &str) {
    fs::write(dir.join("engine.yaml"), content).expect("Failed to write engine.yaml");
}

pub fn parse_workflow(yaml: &str) -> Workflow {
    WorkflowLoader::parse(yaml, "test").expect("Failed to parse workflow")
}

/// Workflow with one notification action per id, in the given order
pub fn notification_workflow(id: &str, trigger: &str, action_ids: &[&str]) -> String {
    let mut yaml = format!("id: {}\ntrigger: {}\nactions:\n", id, trigger);
    for action_id in action_ids {
        yaml.push_str(&format!(
            "  - id: {0}\n    type: create_notification\n    config:\n      title: \"{0}\"\n      message: \"clinic {{{{clinicId}}}}\"\n",
            action_id
        ));
    }
    yaml
}

pub const WELCOME_CLINIC: &str = r#"
id: welcome-clinic
name: Welcome new clinics
trigger: ClinicCreated
actions:
  - id: notify-team
    type: create_notification
    config:
      title: Novo Cliente
      message: "Clinic {{clinicId}} signed up"
  - id: welcome-email
    type: send_email
    config:
      to: "{{ownerEmail}}"
      subject: "Welcome to the platform"
      body: "Your clinic {{clinicId}} is ready."
  - id: audit
    type: webhook
    config:
      url: https://audit.example/hook
"#;

// ============================================================================
// Fakes
// ============================================================================

/// Webhook client that records requests and answers with a fixed status
#[derive(Default)]
pub struct ScriptedWebhookClient {
    status: u16,
    requests: Mutex<Vec<(String, Value)>>,
}

impl ScriptedWebhookClient {
    pub fn with_status(status: u16) -> Self {
        Self {
            status,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebhookClient for ScriptedWebhookClient {
    async fn post_json(&self, url: &str, body: &Value) -> Result<WebhookResponse, BridgeError> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), body.clone()));
        Ok(WebhookResponse {
            status: self.status,
            body: String::new(),
            elapsed_ms: 1,
        })
    }
}

/// Scheduler that only records what it was asked to defer
#[derive(Default)]
pub struct RecordingScheduler {
    jobs: Mutex<Vec<(DeferredAction, Duration)>>,
    fail: bool,
}

impl RecordingScheduler {
    pub fn failing() -> Self {
        Self {
            jobs: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn jobs(&self) -> Vec<(DeferredAction, Duration)> {
        self.jobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl DelayScheduler for RecordingScheduler {
    async fn schedule(&self, job: DeferredAction, delay: Duration) -> Result<(), BridgeError> {
        if self.fail {
            return Err(BridgeError::Transport("scheduler unavailable".to_string()));
        }
        self.jobs.lock().unwrap().push((job, delay));
        Ok(())
    }
}

/// Execution store that rejects action executions after a number of appends
pub struct FailingExecutionStore {
    inner: InMemoryExecutionStore,
    allowed_appends: usize,
    appends: AtomicUsize,
}

impl FailingExecutionStore {
    pub fn new(inner: InMemoryExecutionStore, allowed_appends: usize) -> Self {
        Self {
            inner,
            allowed_appends,
            appends: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ExecutionStore for FailingExecutionStore {
    async fn insert_execution(&self, execution: &Execution) -> Result<(), BridgeError> {
        self.inner.insert_execution(execution).await
    }

    async fn update_execution(&self, execution: &Execution) -> Result<(), BridgeError> {
        self.inner.update_execution(execution).await
    }

    async fn get_execution(&self, execution_id: Uuid) -> Result<Option<Execution>, BridgeError> {
        self.inner.get_execution(execution_id).await
    }

    async fn append_action_execution(
        &self,
        action_execution: &ActionExecution,
    ) -> Result<(), BridgeError> {
        if self.appends.fetch_add(1, Ordering::SeqCst) >= self.allowed_appends {
            return Err(BridgeError::Storage("database unavailable".to_string()));
        }
        self.inner.append_action_execution(action_execution).await
    }

    async fn update_action_execution(
        &self,
        action_execution: &ActionExecution,
    ) -> Result<(), BridgeError> {
        self.inner.update_action_execution(action_execution).await
    }
}

// ============================================================================
// Harness
// ============================================================================

/// An orchestrator wired to in-memory adapters, with handles to inspect them
pub struct Harness {
    pub orchestrator: Arc<Orchestrator>,
    pub repository: InMemoryWorkflowRepository,
    pub store: InMemoryExecutionStore,
    pub email: OutboxEmailSender,
    pub notifications: InMemoryNotificationStore,
    pub tags: InMemoryTagStore,
    pub tickets: InMemoryTicketStore,
    pub webhooks: Arc<ScriptedWebhookClient>,
    pub scheduler: Arc<RecordingScheduler>,
}

pub struct HarnessBuilder {
    workflows: Vec<Workflow>,
    webhook_status: u16,
    scheduler: RecordingScheduler,
    allowed_appends: Option<usize>,
}

impl HarnessBuilder {
    pub fn new() -> Self {
        Self {
            workflows: Vec::new(),
            webhook_status: 200,
            scheduler: RecordingScheduler::default(),
            allowed_appends: None,
        }
    }

    pub fn workflow(mut self, yaml: &str) -> Self {
        self.workflows.push(parse_workflow(yaml));
        self
    }

    pub fn webhook_status(mut self, status: u16) -> Self {
        self.webhook_status = status;
        self
    }

    pub fn failing_scheduler(mut self) -> Self {
        self.scheduler = RecordingScheduler::failing();
        self
    }

    pub fn fail_after_appends(mut self, allowed: usize) -> Self {
        self.allowed_appends = Some(allowed);
        self
    }

    pub fn build(self) -> Harness {
        let repository = InMemoryWorkflowRepository::new(self.workflows);
        let store = InMemoryExecutionStore::new();
        let email = OutboxEmailSender::new();
        let notifications = InMemoryNotificationStore::new();
        let tags = InMemoryTagStore::new();
        let tickets = InMemoryTicketStore::new();
        let webhooks = Arc::new(ScriptedWebhookClient::with_status(self.webhook_status));
        let scheduler = Arc::new(self.scheduler);

        let execution_store: Arc<dyn ExecutionStore> = match self.allowed_appends {
            Some(allowed) => Arc::new(FailingExecutionStore::new(store.clone(), allowed)),
            None => Arc::new(store.clone()),
        };

        let ports = ActionPorts {
            email: Arc::new(email.clone()),
            notifications: Arc::new(notifications.clone()),
            tags: Arc::new(tags.clone()),
            tickets: Arc::new(tickets.clone()),
            webhooks: webhooks.clone(),
        };

        let orchestrator = Arc::new(Orchestrator::new(
            Arc::new(repository.clone()),
            execution_store,
            ActionDispatcher::new(ports),
            scheduler.clone(),
        ));

        Harness {
            orchestrator,
            repository,
            store,
            email,
            notifications,
            tags,
            tickets,
            webhooks,
            scheduler,
        }
    }
}
