//! Error types for the alert dispatch path.
//!
//! Everything the library can surface to a caller lives in [`AlertError`].
//! Configuration loading and the binary use `anyhow` on top of this.

use thiserror::Error;

/// Errors raised while deciding on, building, or delivering an alert.
#[derive(Debug, Error)]
pub enum AlertError {
    /// The target resolved to a non-empty value that is not an absolute URL.
    #[error("webhook url for target '{target}' is not valid: '{url}'")]
    InvalidWebhookUrl { target: String, url: String },

    /// The configured delivery job identifier is empty, missing or unregistered.
    #[error("delivery job '{}' does not exist", .identifier.as_deref().unwrap_or("<none>"))]
    JobClassNotFound { identifier: Option<String> },

    /// The HTTP request to the webhook could not be completed.
    #[error("HTTP request to webhook failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The webhook answered with a non-success status.
    #[error("webhook rejected the message: status {status}, body: {body}")]
    WebhookRejected { status: u16, body: String },

    /// The blocking delivery task did not complete.
    #[error("delivery task failed: {0}")]
    Join(String),

    /// The named queue has no room left for another job.
    #[error("queue '{queue}' is full")]
    QueueFull { queue: String },

    /// The queue runtime is shut down and accepts no more jobs.
    #[error("queue '{queue}' is closed")]
    QueueClosed { queue: String },
}

impl AlertError {
    /// Whether the error was raised by the decision path, before any side effect.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            AlertError::InvalidWebhookUrl { .. } | AlertError::JobClassNotFound { .. }
        )
    }
}
