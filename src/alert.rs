//! The fluent alert API.
//!
//! ```ignore
//! let alerts = SlackAlerts::new(dispatcher);
//! alerts.to("marketing").to_channel("random").message("Deploy finished").await?;
//! ```
//!
//! Every builder method takes the [`PendingAlert`] by value and returns it, so
//! two chains started from the same [`SlackAlerts`] never see each other's
//! overrides.

use crate::core::{Dispatch, Payload};
use crate::dispatcher::Dispatcher;
use crate::error::AlertError;
use serde_json::Value;
use std::sync::Arc;

/// The overrides accumulated by one call chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertConfig {
    /// Named webhook target, or a literal webhook URL.
    pub target: String,
    pub channel: Option<String>,
    pub username: Option<String>,
    pub icon_url: Option<String>,
    pub icon_emoji: Option<String>,
    /// Queue override for asynchronous delivery.
    pub queue: Option<String>,
    /// Sync override; `None` falls back to the configured default.
    pub sync: Option<bool>,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            target: "default".to_string(),
            channel: None,
            username: None,
            icon_url: None,
            icon_emoji: None,
            queue: None,
            sync: None,
        }
    }
}

/// Entry point for sending alerts.
#[derive(Debug, Clone)]
pub struct SlackAlerts {
    dispatcher: Arc<Dispatcher>,
}

impl SlackAlerts {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Starts a new call chain with no overrides.
    pub fn alert(&self) -> PendingAlert {
        PendingAlert {
            dispatcher: self.dispatcher.clone(),
            config: AlertConfig::default(),
        }
    }

    pub fn to(&self, target: impl Into<String>) -> PendingAlert {
        self.alert().to(target)
    }

    pub fn to_channel(&self, channel: impl Into<String>) -> PendingAlert {
        self.alert().to_channel(channel)
    }

    pub fn on_queue(&self, queue: impl Into<String>) -> PendingAlert {
        self.alert().on_queue(queue)
    }

    pub fn sync(&self, sync: bool) -> PendingAlert {
        self.alert().sync(sync)
    }

    pub fn sync_now(&self) -> PendingAlert {
        self.alert().sync_now()
    }

    pub fn with_username(&self, username: impl Into<String>) -> PendingAlert {
        self.alert().with_username(username)
    }

    pub fn with_icon_url(&self, icon_url: impl Into<String>) -> PendingAlert {
        self.alert().with_icon_url(icon_url)
    }

    pub fn with_icon_emoji(&self, icon_emoji: impl Into<String>) -> PendingAlert {
        self.alert().with_icon_emoji(icon_emoji)
    }

    /// Sends a text message to the default target.
    pub async fn message(&self, text: impl Into<String>) -> Result<Dispatch, AlertError> {
        self.alert().message(text).await
    }

    /// Sends blocks to the default target.
    pub async fn blocks(&self, blocks: Vec<Value>) -> Result<Dispatch, AlertError> {
        self.alert().blocks(blocks).await
    }
}

/// An alert being configured. Finished by [`message`](Self::message) or
/// [`blocks`](Self::blocks).
#[derive(Debug, Clone)]
#[must_use = "an alert is only sent by calling `message` or `blocks`"]
pub struct PendingAlert {
    dispatcher: Arc<Dispatcher>,
    config: AlertConfig,
}

impl PendingAlert {
    /// Selects the webhook target by name, or by literal URL.
    pub fn to(mut self, target: impl Into<String>) -> Self {
        self.config.target = target.into();
        self
    }

    pub fn to_channel(mut self, channel: impl Into<String>) -> Self {
        self.config.channel = Some(channel.into());
        self
    }

    pub fn on_queue(mut self, queue: impl Into<String>) -> Self {
        self.config.queue = Some(queue.into());
        self
    }

    /// Forces inline (`true`) or queued (`false`) delivery.
    pub fn sync(mut self, sync: bool) -> Self {
        self.config.sync = Some(sync);
        self
    }

    /// Shorthand for `sync(true)`.
    pub fn sync_now(self) -> Self {
        self.sync(true)
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.config.username = Some(username.into());
        self
    }

    pub fn with_icon_url(mut self, icon_url: impl Into<String>) -> Self {
        self.config.icon_url = Some(icon_url.into());
        self
    }

    pub fn with_icon_emoji(mut self, icon_emoji: impl Into<String>) -> Self {
        self.config.icon_emoji = Some(icon_emoji.into());
        self
    }

    /// The overrides accumulated so far.
    pub fn config(&self) -> &AlertConfig {
        &self.config
    }

    /// Sends a plain text message.
    pub async fn message(self, text: impl Into<String>) -> Result<Dispatch, AlertError> {
        self.send(Payload::Text(text.into())).await
    }

    /// Sends a list of Slack blocks.
    pub async fn blocks(self, blocks: Vec<Value>) -> Result<Dispatch, AlertError> {
        self.send(Payload::Blocks(blocks)).await
    }

    async fn send(self, payload: Payload) -> Result<Dispatch, AlertError> {
        self.dispatcher.dispatch(&self.config, payload).await
    }
}
