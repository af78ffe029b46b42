//! A fake job bus that records deliveries instead of performing them.

use async_trait::async_trait;
use slack_alerts::{
    config::DEFAULT_JOB, AlertError, DeliveryHandler, DeliveryJob, Dispatcher, JobQueue,
    JobRegistry, QueuedJob, SlackAlerts, WebhookRegistry,
};
use std::sync::{Arc, Mutex};

/// Records jobs run inline and jobs pushed to a queue.
#[derive(Clone, Debug, Default)]
pub struct FakeBus {
    executed: Arc<Mutex<Vec<DeliveryJob>>>,
    queued: Arc<Mutex<Vec<(String, DeliveryJob)>>>,
}

impl FakeBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a client whose default job and queue record into this bus.
    pub fn alerts(&self, registry: WebhookRegistry) -> SlackAlerts {
        let mut jobs = JobRegistry::new();
        let bus = self.clone();
        jobs.register(DEFAULT_JOB, move || {
            Arc::new(RecordingJob { bus: bus.clone() }) as Arc<dyn DeliveryHandler>
        });
        let dispatcher = Dispatcher::new(registry, jobs, Arc::new(self.clone()));
        SlackAlerts::new(Arc::new(dispatcher))
    }

    /// Jobs that ran inline, before the dispatch call returned.
    pub fn executed(&self) -> Vec<DeliveryJob> {
        self.executed.lock().unwrap().clone()
    }

    /// Jobs pushed to a queue, with the queue name.
    pub fn queued(&self) -> Vec<(String, DeliveryJob)> {
        self.queued.lock().unwrap().clone()
    }

    pub fn dispatched_count(&self) -> usize {
        self.executed.lock().unwrap().len() + self.queued.lock().unwrap().len()
    }

    pub fn assert_nothing_dispatched(&self) {
        assert_eq!(self.dispatched_count(), 0, "expected no job to be dispatched");
    }
}

impl JobQueue for FakeBus {
    fn push(&self, queue: &str, job: QueuedJob) -> Result<(), AlertError> {
        self.queued
            .lock()
            .unwrap()
            .push((queue.to_string(), job.job));
        Ok(())
    }
}

struct RecordingJob {
    bus: FakeBus,
}

#[async_trait]
impl DeliveryHandler for RecordingJob {
    fn name(&self) -> &str {
        DEFAULT_JOB
    }

    async fn execute(&self, job: &DeliveryJob) -> Result<(), AlertError> {
        self.bus.executed.lock().unwrap().push(job.clone());
        Ok(())
    }
}
