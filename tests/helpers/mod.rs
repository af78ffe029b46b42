#![allow(dead_code)]
pub mod fake_bus;

use slack_alerts::WebhookRegistry;

pub const TEST_WEBHOOK_URL: &str = "https://test-domain.com";

/// A registry with the default target pointing at [`TEST_WEBHOOK_URL`].
pub fn registry_with_default() -> WebhookRegistry {
    WebhookRegistry::default().with_webhook("default", TEST_WEBHOOK_URL)
}

/// A single mrkdwn section block.
pub fn hello_blocks() -> Vec<serde_json::Value> {
    vec![serde_json::json!({
        "type": "section",
        "text": {
            "type": "mrkdwn",
            "text": "Hello!",
        },
    })]
}
