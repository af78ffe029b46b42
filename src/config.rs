//! Configuration management for slack-alerts
//!
//! This module defines the `Config` struct holding the webhook targets and the
//! delivery defaults. It uses the `figment` crate to layer built-in defaults, a
//! `slack-alerts.toml` file, `SLACK_ALERTS_` environment variables and the
//! command-line arguments.

use crate::cli::Cli;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// The identifier of the built-in Slack webhook delivery job.
pub const DEFAULT_JOB: &str = "slack_webhook";

/// The configuration file used when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "slack-alerts.toml";

/// The main configuration struct.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Global kill switch. When false, nothing is ever sent.
    pub enabled: bool,
    /// Named webhook targets. The `default` target is used unless `to()` says otherwise.
    pub webhook_urls: BTreeMap<String, String>,
    /// Identifier of the delivery job implementation.
    pub job: Option<String>,
    /// Queue used for asynchronous delivery.
    pub queue: String,
    /// Deliver inline instead of through the queue.
    pub sync: bool,
    /// The logging level for the binary.
    pub log_level: String,
    /// Timeout for a single webhook request.
    pub http_timeout_seconds: u64,
    /// Maximum number of jobs waiting in one queue.
    pub queue_capacity: usize,
}

impl Config {
    /// Loads the configuration by layering defaults, file, environment and CLI.
    ///
    /// # Arguments
    /// * `cli` - The parsed command-line arguments; also selects the config file.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            // e.g. SLACK_ALERTS_WEBHOOK_URLS__DEFAULT=https://hooks.slack.com/...
            .merge(Env::prefixed("SLACK_ALERTS_").split("__"))
            .merge(cli.clone())
            .extract()?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: true,
            webhook_urls: BTreeMap::from([("default".to_string(), String::new())]),
            job: Some(DEFAULT_JOB.to_string()),
            queue: "default".to_string(),
            sync: false,
            log_level: "info".to_string(),
            http_timeout_seconds: 10,
            queue_capacity: 1000,
        }
    }
}
