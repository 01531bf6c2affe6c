//! Fire-and-forget webhook ingestion
//!
//! `WebhookQueue::submit` hands the payload to a bounded channel and returns
//! immediately. A pool of worker tasks turns each payload into a log event
//! and inserts it. Failures end at the worker: they are logged and counted,
//! never reported back to the submitter.
//!
//! Job lifecycle: `Queued -> Completed | Failed`, no retries.

use crate::error::{SerializationError, StorageError, WebhookError};
use crate::store::{EventStore, ExtraData, NewEvent};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

/// Level assigned to webhook-derived events
pub const WEBHOOK_LEVEL: &str = "INFO";

/// Source assigned to webhook-derived events
pub const WEBHOOK_SOURCE: &str = "webhook";

/// Placeholder used when the payload carries no `type`
pub const UNKNOWN_TYPE: &str = "unknown";

/// Terminal state of a webhook job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Completed,
    Failed,
}

impl JobOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobOutcome::Completed => "completed",
            JobOutcome::Failed => "failed",
        }
    }
}

#[derive(Debug)]
struct WebhookJob {
    payload: ExtraData,
}

/// Submission handle
///
/// Cloneable; the workers exit once every clone has been dropped and the
/// queue is drained.
#[derive(Clone)]
pub struct WebhookQueue {
    sender: mpsc::Sender<WebhookJob>,
}

/// Join handles of the worker pool
pub struct WebhookWorkers {
    handles: Vec<JoinHandle<()>>,
}

impl WebhookQueue {
    /// Spawn `workers` tasks consuming a queue of `capacity` jobs
    ///
    /// # Example
    ///
    /// ```ignore
    /// let (queue, workers) = WebhookQueue::spawn(store.clone(), 1024, 2);
    /// queue.submit(payload)?;  // Non-blocking
    /// ```
    pub fn spawn(store: EventStore, capacity: usize, workers: usize) -> (Self, WebhookWorkers) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let rx = Arc::new(Mutex::new(rx));

        let handles = (0..workers.max(1))
            .map(|worker_id| {
                let store = store.clone();
                let rx = rx.clone();
                tokio::spawn(async move {
                    worker_task(worker_id, store, rx).await;
                })
            })
            .collect();

        (Self { sender: tx }, WebhookWorkers { handles })
    }

    /// Queue a payload for ingestion without waiting for it to be stored
    pub fn submit(&self, payload: ExtraData) -> Result<(), WebhookError> {
        self.sender
            .try_send(WebhookJob { payload })
            .map_err(|err| match err {
                mpsc::error::TrySendError::Full(_) => WebhookError::QueueFull,
                mpsc::error::TrySendError::Closed(_) => WebhookError::QueueClosed,
            })?;

        tracing::info!("Received webhook data");
        Ok(())
    }
}

impl WebhookWorkers {
    /// Wait for the workers to drain the queue and exit
    ///
    /// Only returns early if `timeout` elapses; remaining jobs are then
    /// abandoned.
    pub async fn join(self, timeout: Duration) {
        let drain = join_all_workers(self.handles);
        if tokio::time::timeout(timeout, drain).await.is_err() {
            tracing::warn!(
                timeout_ms = timeout.as_millis() as u64,
                "Webhook workers did not drain before timeout"
            );
        }
    }
}

async fn join_all_workers(handles: Vec<JoinHandle<()>>) {
    for handle in handles {
        if let Err(e) = handle.await {
            tracing::error!(error = %e, "Webhook worker panicked");
        }
    }
}

/// Worker loop: one job at a time until the channel closes
async fn worker_task(
    worker_id: usize,
    store: EventStore,
    rx: Arc<Mutex<mpsc::Receiver<WebhookJob>>>,
) {
    loop {
        // Hold the lock only while waiting, not while processing
        let job = { rx.lock().await.recv().await };
        let Some(job) = job else { break };

        let outcome = match process_job(&store, job).await {
            Ok(id) => {
                tracing::info!(worker = worker_id, id = id, "Webhook data processed successfully");
                JobOutcome::Completed
            }
            Err(e) => {
                tracing::error!(worker = worker_id, error = %e, "Error processing webhook data");
                JobOutcome::Failed
            }
        };
        crate::metrics::record_webhook_job(outcome);
    }

    tracing::info!(worker = worker_id, "Webhook worker shutting down");
}

async fn process_job(store: &EventStore, job: WebhookJob) -> Result<i64, StorageError> {
    tracing::debug!("Processing webhook data in background...");
    let event = derive_event(job.payload)?;
    let stored = store.insert(event).await?;
    crate::metrics::record_event_ingested("webhook", &stored.level);
    Ok(stored.id)
}

/// Build the log event recorded for a webhook payload
///
/// The payload is checked for serializability up front so a bad payload
/// fails as a serialization error before touching the store.
pub fn derive_event(payload: ExtraData) -> Result<NewEvent, SerializationError> {
    serde_json::to_string(&payload)?;

    let message = format!("Webhook processed: {}", payload_type(&payload));
    Ok(NewEvent::new(WEBHOOK_LEVEL, message, WEBHOOK_SOURCE).with_extra_data(payload))
}

fn payload_type(payload: &ExtraData) -> String {
    match payload.get("type") {
        None => UNKNOWN_TYPE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
