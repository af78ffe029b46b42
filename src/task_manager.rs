//! Tracks the worker tasks spawned by the queue runtime.
use futures::future::join_all;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// A centralized manager for spawned tasks.
///
/// This struct is responsible for:
/// - Spawning tasks and keeping track of their `JoinHandle`s.
/// - Awaiting all of them on shutdown and reporting the ones that panicked.
#[derive(Clone, Debug, Default)]
pub struct TaskManager {
    handles: Arc<Mutex<Vec<(String, JoinHandle<()>)>>>,
}

impl TaskManager {
    /// Creates a new `TaskManager`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a new task and adds its handle to the manager.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<F>(&self, name: impl Into<String>, future: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let name = name.into();
        debug!(task_name = %name, "Spawning task");
        let handle = tokio::spawn(future);
        self.handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((name, handle));
    }

    /// The number of tasks spawned and not yet awaited.
    pub fn len(&self) -> usize {
        self.handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Waits for all managed tasks to complete.
    ///
    /// Returns the names of the tasks that panicked.
    pub async fn shutdown(&self) -> Vec<String> {
        let handles = self
            .handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect::<Vec<_>>();
        info!(
            "TaskManager shutting down. Waiting for {} tasks to complete...",
            handles.len()
        );

        let (task_names, handles): (Vec<String>, Vec<JoinHandle<()>>) =
            handles.into_iter().unzip();
        let results = join_all(handles).await;

        let mut panicked = Vec::new();
        for (task_name, result) in task_names.into_iter().zip(results) {
            match result {
                Ok(()) => debug!(task_name = %task_name, "Task shut down gracefully."),
                Err(e) => {
                    error!(task_name = %task_name, error = %e, "Task panicked during shutdown.");
                    panicked.push(task_name);
                }
            }
        }

        if panicked.is_empty() {
            info!("All tasks shut down gracefully.");
        } else {
            error!("{} tasks panicked during shutdown: {:?}", panicked.len(), panicked);
        }
        panicked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_reports_panicked_tasks() {
        let tasks = TaskManager::new();
        tasks.spawn("ok", async {});
        tasks.spawn("boom", async { panic!("worker failed") });
        assert_eq!(tasks.len(), 2);

        let panicked = tasks.shutdown().await;

        assert_eq!(panicked, vec!["boom".to_string()]);
        assert!(tasks.is_empty());
    }
}
