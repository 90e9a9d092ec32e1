//! Delay Scheduler - Runs delayed actions later
//!
//! The orchestrator hands delayed actions to a [`DelayScheduler`] and moves
//! on. The scheduler must eventually call
//! [`Orchestrator::execute_deferred_action`](super::Orchestrator::execute_deferred_action)
//! with the job.
//!
//! [`TokioDelayScheduler`] is the in-process implementation: each job sleeps
//! on its own task, then is queued for a [`DeferredActionWorker`] that runs it
//! against the orchestrator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{debug, error, warn};
use uuid::Uuid;

use super::orchestrator::Orchestrator;
use crate::bridge::BridgeError;
use crate::workflow::TriggerData;

/// Payload of a delayed action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeferredAction {
    pub action_id: String,
    pub execution_id: Uuid,
    pub trigger_data: TriggerData,
}

/// Port for deferring an action. Fire-and-forget: returns once accepted.
#[async_trait]
pub trait DelayScheduler: Send + Sync {
    async fn schedule(&self, job: DeferredAction, delay: Duration) -> Result<(), BridgeError>;
}

#[derive(Debug, Default)]
struct PendingJobs {
    count: AtomicUsize,
    idle: Notify,
}

impl PendingJobs {
    fn add(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    fn done(&self) {
        if self.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.idle.notify_waiters();
        }
    }

    async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            if self.count.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }
}

#[derive(Debug, Clone)]
pub struct TokioDelayScheduler {
    sender: async_channel::Sender<DeferredAction>,
    pending: Arc<PendingJobs>,
}

impl TokioDelayScheduler {
    /// Create a scheduler and the worker that must be run to execute its jobs
    pub fn new(capacity: usize) -> (Self, DeferredActionWorker) {
        let (sender, receiver) = async_channel::bounded(capacity.max(1));
        let pending = Arc::new(PendingJobs::default());
        let scheduler = Self {
            sender,
            pending: pending.clone(),
        };
        let worker = DeferredActionWorker { receiver, pending };
        (scheduler, worker)
    }

    /// Jobs scheduled but not yet finished
    pub fn pending(&self) -> usize {
        self.pending.count.load(Ordering::SeqCst)
    }

    /// Wait until every scheduled job has run
    pub async fn wait_idle(&self) {
        self.pending.wait_idle().await
    }
}

#[async_trait]
impl DelayScheduler for TokioDelayScheduler {
    async fn schedule(&self, job: DeferredAction, delay: Duration) -> Result<(), BridgeError> {
        if self.sender.is_closed() {
            return Err(BridgeError::Transport(
                "deferred action queue is closed".to_string(),
            ));
        }

        debug!(
            action_id = %job.action_id,
            execution_id = %job.execution_id,
            delay_ms = delay.as_millis() as u64,
            "Deferring action"
        );

        self.pending.add();
        let sender = self.sender.clone();
        let pending = self.pending.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = sender.send(job).await {
                warn!(action_id = %e.0.action_id, "Deferred action dropped, queue closed");
                pending.done();
            }
        });
        Ok(())
    }
}

/// Consumes due jobs and runs them against the orchestrator
#[derive(Debug)]
pub struct DeferredActionWorker {
    receiver: async_channel::Receiver<DeferredAction>,
    pending: Arc<PendingJobs>,
}

impl DeferredActionWorker {
    /// Run until the scheduler side of the queue is dropped.
    ///
    /// Jobs run on their own tasks, so deferred actions of the same execution
    /// may complete in any order.
    pub async fn run(self, orchestrator: Arc<Orchestrator>) {
        while let Ok(job) = self.receiver.recv().await {
            let orchestrator = orchestrator.clone();
            let pending = self.pending.clone();
            tokio::spawn(async move {
                if let Err(e) = orchestrator.execute_deferred_action(&job).await {
                    error!(
                        action_id = %job.action_id,
                        execution_id = %job.execution_id,
                        error = %e,
                        "Deferred action could not be executed"
                    );
                }
                pending.done();
            });
        }
    }
}
