/// slack-alerts - send alerts to Slack incoming webhooks
///
/// This library resolves named webhook targets, applies per-call overrides,
/// and delivers the message either inline or through a background queue.
pub mod alert;
pub mod cli;
pub mod config;
pub mod core;
pub mod dispatcher;
pub mod error;
pub mod notification;
pub mod queue;
pub mod registry;
pub mod task_manager;

// Re-export the main entry points for convenience
pub use crate::alert::{AlertConfig, PendingAlert, SlackAlerts};
pub use crate::core::{DeliveryHandler, DeliveryJob, Dispatch, JobQueue, Payload, QueuedJob, SkipReason};
pub use crate::dispatcher::Dispatcher;
pub use crate::error::AlertError;
pub use crate::notification::{JobRegistry, SlackWebhookJob};
pub use crate::queue::WorkerQueue;
pub use crate::registry::WebhookRegistry;

use crate::config::Config;
use std::sync::Arc;
use std::time::Duration;

/// Builds a ready-to-use client from configuration.
///
/// Returns the client together with the queue runtime backing it, so the
/// caller can shut the queue down once it is done sending.
pub fn build_alerts(config: &Config) -> (SlackAlerts, Arc<WorkerQueue>) {
    let queue = Arc::new(WorkerQueue::new(config.queue_capacity));
    let dispatcher = Dispatcher::new(
        WebhookRegistry::from_config(config),
        JobRegistry::with_defaults(Duration::from_secs(config.http_timeout_seconds)),
        queue.clone(),
    );
    (SlackAlerts::new(Arc::new(dispatcher)), queue)
}
