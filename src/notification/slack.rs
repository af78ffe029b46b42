//! The built-in delivery job: POSTs the message to a Slack incoming webhook.

use crate::core::{DeliveryHandler, DeliveryJob};
use crate::error::AlertError;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tokio::task;
use tracing::{error, info, instrument};

/// Delivers jobs to Slack incoming webhooks over HTTP.
#[derive(Debug, Clone)]
pub struct SlackWebhookJob {
    timeout: Duration,
}

impl SlackWebhookJob {
    /// Creates a new `SlackWebhookJob` with the given request timeout.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Sends the request in a blocking manner.
    fn send_request(
        client: reqwest::blocking::Client,
        webhook_url: reqwest::Url,
        payload: &Value,
    ) -> Result<(), AlertError> {
        let response = client.post(webhook_url).json(payload).send();

        match response {
            Ok(res) => {
                if res.status().is_success() {
                    Ok(())
                } else {
                    let status = res.status();
                    let text = res.text().unwrap_or_default();
                    error!(
                        status = %status,
                        body = %text,
                        "Slack webhook rejected the message"
                    );
                    Err(AlertError::WebhookRejected {
                        status: status.as_u16(),
                        body: text,
                    })
                }
            }
            Err(e) => {
                error!(error = %e, "HTTP request to Slack failed");
                Err(e.into())
            }
        }
    }
}

impl Default for SlackWebhookJob {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

#[async_trait]
impl DeliveryHandler for SlackWebhookJob {
    fn name(&self) -> &str {
        crate::config::DEFAULT_JOB
    }

    /// Posts the job's body to its webhook URL.
    #[instrument(skip(self, job), fields(host = job.url().host_str().unwrap_or_default()))]
    async fn execute(&self, job: &DeliveryJob) -> Result<(), AlertError> {
        let payload = job.body();
        let webhook_url = job.url().clone();
        let timeout = self.timeout;

        // The blocking client must not be built or dropped on a runtime thread.
        let result = task::spawn_blocking(move || {
            let client = reqwest::blocking::Client::builder()
                .timeout(timeout)
                .build()?;
            Self::send_request(client, webhook_url, &payload)
        })
        .await;

        match result {
            Ok(Ok(())) => {
                info!("Successfully sent message to Slack.");
                Ok(())
            }
            Ok(Err(e)) => Err(e),
            Err(e) => {
                error!(error = %e, "Slack delivery task failed");
                Err(AlertError::Join(e.to_string()))
            }
        }
    }
}
