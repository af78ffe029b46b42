//! The dispatch decision: whether to send, where to, and how.
//!
//! Every call walks the same linear path in the caller's task:
//! enabled check, job resolution, URL resolution, job construction, then
//! either inline execution or submission to a queue. A failing check ends the
//! walk before any side effect happens.

use crate::alert::AlertConfig;
use crate::core::{DeliveryJob, Dispatch, JobQueue, Payload, QueuedJob, SkipReason};
use crate::error::AlertError;
use crate::notification::JobRegistry;
use crate::registry::WebhookRegistry;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Turns configured alerts into delivered or queued jobs.
pub struct Dispatcher {
    registry: WebhookRegistry,
    jobs: JobRegistry,
    queue: Arc<dyn JobQueue>,
}

impl Dispatcher {
    /// Creates a new `Dispatcher`.
    pub fn new(registry: WebhookRegistry, jobs: JobRegistry, queue: Arc<dyn JobQueue>) -> Self {
        Self {
            registry,
            jobs,
            queue,
        }
    }

    /// Dispatches one alert.
    ///
    /// # Returns
    /// * `Ok(Dispatch::Skipped(_))` if alerts are disabled or the target has no URL
    /// * `Ok(Dispatch::Inline)` once a sync delivery has completed
    /// * `Ok(Dispatch::Queued { .. })` once an async delivery has been submitted
    /// * `Err` for an unknown job, an invalid URL, a failed sync delivery, or a
    ///   rejected submission
    #[instrument(skip(self, config, payload), fields(target = %config.target))]
    pub async fn dispatch(
        &self,
        config: &AlertConfig,
        payload: Payload,
    ) -> Result<Dispatch, AlertError> {
        if !self.registry.is_enabled() {
            debug!("Alerts are disabled, skipping.");
            metrics::counter!("slack_alerts_skipped_total", "reason" => "disabled").increment(1);
            return Ok(Dispatch::Skipped(SkipReason::Disabled));
        }

        // Job resolution precedes URL resolution: a bad job identifier is
        // reported even when the target would have been skipped.
        let handler = self.jobs.resolve(self.registry.job())?;

        let Some(url) = self.registry.resolve(&config.target)? else {
            debug!("No webhook URL for target, skipping.");
            metrics::counter!("slack_alerts_skipped_total", "reason" => "no_webhook_url")
                .increment(1);
            return Ok(Dispatch::Skipped(SkipReason::NoWebhookUrl));
        };

        let mut job = DeliveryJob::new(url, payload);
        job.channel = config.channel.clone();
        job.username = config.username.clone();
        job.icon_url = config.icon_url.clone();
        job.icon_emoji = config.icon_emoji.clone();

        let sync = config.sync.unwrap_or(self.registry.default_sync());
        if sync {
            handler.execute(&job).await?;
            info!(job = handler.name(), "Delivered alert inline.");
            metrics::counter!("slack_alerts_dispatched_total", "mode" => "inline").increment(1);
            return Ok(Dispatch::Inline);
        }

        let queue = config
            .queue
            .clone()
            .unwrap_or_else(|| self.registry.default_queue().to_string());
        self.queue.push(&queue, QueuedJob { handler, job })?;
        info!(queue = %queue, "Queued alert for delivery.");
        metrics::counter!("slack_alerts_dispatched_total", "mode" => "queued").increment(1);
        Ok(Dispatch::Queued { queue })
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("jobs", &self.jobs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DeliveryHandler;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingQueue {
        pushed: Mutex<Vec<(String, DeliveryJob)>>,
    }

    impl JobQueue for RecordingQueue {
        fn push(&self, queue: &str, job: QueuedJob) -> Result<(), AlertError> {
            self.pushed
                .lock()
                .unwrap()
                .push((queue.to_string(), job.job));
            Ok(())
        }
    }

    struct FailingJob;

    #[async_trait]
    impl DeliveryHandler for FailingJob {
        fn name(&self) -> &str {
            "failing"
        }

        async fn execute(&self, _job: &DeliveryJob) -> Result<(), AlertError> {
            Err(AlertError::WebhookRejected {
                status: 500,
                body: "boom".to_string(),
            })
        }
    }

    fn dispatcher(registry: WebhookRegistry) -> (Dispatcher, Arc<RecordingQueue>) {
        let queue = Arc::new(RecordingQueue::default());
        let mut jobs = JobRegistry::new();
        jobs.register("failing", || Arc::new(FailingJob) as Arc<dyn DeliveryHandler>);
        (
            Dispatcher::new(registry.with_job("failing"), jobs, queue.clone()),
            queue,
        )
    }

    #[tokio::test]
    async fn test_queues_with_default_queue() {
        let (dispatcher, queue) =
            dispatcher(WebhookRegistry::default().with_webhook("default", "https://x.test"));

        let outcome = dispatcher
            .dispatch(&AlertConfig::default(), Payload::Text("hi".to_string()))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            Dispatch::Queued {
                queue: "default".to_string()
            }
        );
        let pushed = queue.pushed.lock().unwrap();
        assert_eq!(pushed.len(), 1);
        assert_eq!(pushed[0].1.url().as_str(), "https://x.test/");
        assert_eq!(pushed[0].1.payload, Payload::Text("hi".to_string()));
    }

    #[tokio::test]
    async fn test_sync_failure_propagates() {
        let (dispatcher, queue) =
            dispatcher(WebhookRegistry::default().with_webhook("default", "https://x.test"));
        let config = AlertConfig {
            sync: Some(true),
            ..Default::default()
        };

        let err = dispatcher
            .dispatch(&config, Payload::Text("hi".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, AlertError::WebhookRejected { status: 500, .. }));
        assert!(queue.pushed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_job_error_masks_missing_url() {
        let queue = Arc::new(RecordingQueue::default());
        let dispatcher = Dispatcher::new(
            WebhookRegistry::default().with_job("non-existing-job"),
            JobRegistry::new(),
            queue.clone(),
        );

        let err = dispatcher
            .dispatch(&AlertConfig::default(), Payload::Text("hi".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, AlertError::JobClassNotFound { .. }));
    }

    #[tokio::test]
    async fn test_disabled_skips_before_job_resolution() {
        let queue = Arc::new(RecordingQueue::default());
        let dispatcher = Dispatcher::new(
            WebhookRegistry::default().with_enabled(false).without_job(),
            JobRegistry::new(),
            queue.clone(),
        );

        let outcome = dispatcher
            .dispatch(&AlertConfig::default(), Payload::Blocks(vec![]))
            .await
            .unwrap();

        assert_eq!(outcome, Dispatch::Skipped(SkipReason::Disabled));
        assert!(queue.pushed.lock().unwrap().is_empty());
    }
}
