//! In-process queue runtime for asynchronous delivery.
//!
//! Each queue name gets its own bounded `async_channel` and a single worker
//! task, created on first use. Jobs on one queue run in FIFO order; there is
//! no ordering between queues. Failed jobs are logged and dropped.

use crate::core::{JobQueue, QueuedJob};
use crate::error::AlertError;
use crate::task_manager::TaskManager;
use async_channel::{Receiver, Sender, TrySendError};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, error, info, instrument};

#[derive(Debug, Default)]
struct QueueState {
    senders: HashMap<String, Sender<QueuedJob>>,
    closed: bool,
}

/// A [`JobQueue`] backed by Tokio worker tasks.
#[derive(Debug)]
pub struct WorkerQueue {
    state: Mutex<QueueState>,
    capacity: usize,
    tasks: TaskManager,
}

impl WorkerQueue {
    /// Creates a runtime whose queues each hold at most `capacity` waiting jobs.
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            capacity: capacity.max(1),
            tasks: TaskManager::new(),
        }
    }

    /// The names of the queues that have received at least one job.
    pub fn queues(&self) -> Vec<String> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = state.senders.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// The number of jobs waiting in `queue`, not counting one being executed.
    pub fn pending(&self, queue: &str) -> usize {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.senders.get(queue).map_or(0, Sender::len)
    }

    /// Stops accepting jobs, lets the workers drain what is already queued,
    /// and waits for them to finish.
    pub async fn shutdown(&self) {
        let senders = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.closed = true;
            std::mem::take(&mut state.senders)
        };
        info!(queues = senders.len(), "Closing delivery queues.");
        for sender in senders.values() {
            sender.close();
        }
        self.tasks.shutdown().await;
    }

    fn sender_for(&self, queue: &str) -> Result<Sender<QueuedJob>, AlertError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.closed {
            return Err(AlertError::QueueClosed {
                queue: queue.to_string(),
            });
        }
        if let Some(sender) = state.senders.get(queue) {
            return Ok(sender.clone());
        }

        let (tx, rx) = async_channel::bounded(self.capacity);
        self.tasks
            .spawn(format!("queue:{queue}"), run_worker(queue.to_string(), rx));
        state.senders.insert(queue.to_string(), tx.clone());
        Ok(tx)
    }
}

impl JobQueue for WorkerQueue {
    fn push(&self, queue: &str, job: QueuedJob) -> Result<(), AlertError> {
        let sender = self.sender_for(queue)?;
        sender.try_send(job).map_err(|e| match e {
            TrySendError::Full(_) => AlertError::QueueFull {
                queue: queue.to_string(),
            },
            TrySendError::Closed(_) => AlertError::QueueClosed {
                queue: queue.to_string(),
            },
        })?;

        metrics::gauge!("slack_alerts_queue_depth", "queue" => queue.to_string())
            .set(sender.len() as f64);
        debug!(queue, pending = sender.len(), "Job enqueued");
        Ok(())
    }
}

/// Drains one queue until it is closed and empty.
#[instrument(skip(rx))]
async fn run_worker(queue: String, rx: Receiver<QueuedJob>) {
    info!("Queue worker started.");
    while let Ok(queued) = rx.recv().await {
        if let Err(e) = queued.run().await {
            error!(job = queued.handler.name(), error = %e, "Queued delivery failed");
            metrics::counter!("slack_alerts_failed_total", "queue" => queue.clone()).increment(1);
        }
    }
    info!("Queue closed, worker shutting down.");
}
