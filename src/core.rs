//! Core domain types and service traits for slack-alerts
//!
//! This module defines the payloads and jobs that flow through the dispatcher,
//! and the trait contracts for the two collaborators it hands work to: the
//! delivery handler that performs the HTTP call and the queue that defers it.

use crate::error::AlertError;
use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// The content of an alert. Exactly one form is sent per call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Payload {
    /// A plain text message.
    Text(String),
    /// An ordered list of opaque Slack block objects.
    Blocks(Vec<Value>),
}

/// A single unit of delivery work.
///
/// The URL has already been resolved and validated by the time a job exists,
/// so a `DeliveryJob` always points at an absolute URL with a host.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryJob {
    url: Url,
    /// The message content.
    pub payload: Payload,
    /// Slack channel override.
    pub channel: Option<String>,
    /// Bot username override.
    pub username: Option<String>,
    /// Bot icon image override.
    pub icon_url: Option<String>,
    /// Bot icon emoji override, e.g. `:heart:`.
    pub icon_emoji: Option<String>,
}

impl DeliveryJob {
    /// Creates a job with no cosmetic overrides.
    pub(crate) fn new(url: Url, payload: Payload) -> Self {
        Self {
            url,
            payload,
            channel: None,
            username: None,
            icon_url: None,
            icon_emoji: None,
        }
    }

    /// The webhook URL this job posts to.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Assembles the JSON body sent to the webhook.
    ///
    /// Override keys are only present when set.
    pub fn body(&self) -> Value {
        let mut body = Map::new();
        match &self.payload {
            Payload::Text(text) => {
                body.insert("text".to_string(), Value::String(text.clone()));
            }
            Payload::Blocks(blocks) => {
                body.insert("blocks".to_string(), Value::Array(blocks.clone()));
            }
        }

        let overrides = [
            ("channel", &self.channel),
            ("username", &self.username),
            ("icon_url", &self.icon_url),
            ("icon_emoji", &self.icon_emoji),
        ];
        for (key, value) in overrides {
            if let Some(value) = value {
                body.insert(key.to_string(), Value::String(value.clone()));
            }
        }

        Value::Object(body)
    }
}

/// Why a dispatch call ended without creating a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Alerts are globally disabled.
    Disabled,
    /// The target has no webhook URL configured, or it is empty.
    NoWebhookUrl,
}

/// The terminal state reached by a successful dispatch decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Nothing was sent, silently.
    Skipped(SkipReason),
    /// The job ran to completion before the call returned.
    Inline,
    /// The job was handed to the named queue and has not necessarily run yet.
    Queued { queue: String },
}

impl Dispatch {
    /// Returns true if a job was created and handed off.
    pub fn is_dispatched(&self) -> bool {
        !matches!(self, Dispatch::Skipped(_))
    }
}

// =============================================================================
// Service Traits
// =============================================================================

/// A delivery job implementation, selected by its configured identifier.
#[async_trait]
pub trait DeliveryHandler: Send + Sync {
    /// The identifier this handler is registered under.
    fn name(&self) -> &str;

    /// Performs the delivery of a single job.
    ///
    /// # Returns
    /// * `Ok(())` once the webhook accepted the message
    /// * `Err` for transport failures or a rejected message
    async fn execute(&self, job: &DeliveryJob) -> Result<(), AlertError>;
}

impl std::fmt::Debug for dyn DeliveryHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryHandler")
            .field("name", &self.name())
            .finish()
    }
}

/// A job together with the handler that will execute it.
#[derive(Debug, Clone)]
pub struct QueuedJob {
    pub handler: Arc<dyn DeliveryHandler>,
    pub job: DeliveryJob,
}

impl QueuedJob {
    /// Executes the job with its handler.
    pub async fn run(&self) -> Result<(), AlertError> {
        self.handler.execute(&self.job).await
    }
}

/// Accepts jobs for deferred, asynchronous execution.
pub trait JobQueue: Send + Sync {
    /// Submits a job to the named queue without waiting for it to run.
    fn push(&self, queue: &str, job: QueuedJob) -> Result<(), AlertError>;
}
