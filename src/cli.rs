//! Command-Line Interface (CLI) argument parsing.
//!
//! This module defines the command-line arguments for the `slack-alerts`
//! binary using the `clap` crate. Global switches are merged into the
//! configuration as a `figment` provider; the per-call overrides are applied
//! to the alert builder.

use crate::alert::PendingAlert;
use clap::{Parser, Subcommand};
use figment::{
    value::{Dict, Map, Value},
    Error, Metadata, Profile, Provider,
};
use std::path::PathBuf;

/// Send an alert to a Slack incoming webhook.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Named webhook target, or a literal webhook URL.
    #[arg(long, value_name = "TARGET")]
    pub to: Option<String>,

    /// Slack channel override.
    #[arg(long)]
    pub channel: Option<String>,

    /// Bot username override.
    #[arg(long)]
    pub username: Option<String>,

    /// Bot icon image URL override.
    #[arg(long, value_name = "URL")]
    pub icon_url: Option<String>,

    /// Bot icon emoji override, e.g. ":heart:".
    #[arg(long, value_name = "EMOJI")]
    pub icon_emoji: Option<String>,

    /// Queue to submit the delivery job to.
    #[arg(long, value_name = "QUEUE")]
    pub queue: Option<String>,

    /// Deliver inline and wait for the webhook response.
    #[arg(long, conflicts_with = "queued")]
    pub sync: bool,

    /// Deliver through the queue even if the configuration says sync.
    #[arg(long = "async")]
    pub queued: bool,

    /// Disable sending entirely.
    #[arg(long)]
    pub disabled: bool,

    /// Logging level, e.g. "debug".
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// What to send.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Send a plain text message.
    Message {
        /// The message text.
        text: String,
    },
    /// Send Slack blocks read from a JSON file ("-" reads stdin).
    Blocks {
        /// Path to a JSON array of block objects.
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Cli {
    /// The sync override requested on the command line, if any.
    pub fn sync_override(&self) -> Option<bool> {
        match (self.sync, self.queued) {
            (true, _) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        }
    }

    /// Applies the per-call overrides to an alert builder.
    pub fn apply(&self, mut alert: PendingAlert) -> PendingAlert {
        if let Some(target) = &self.to {
            alert = alert.to(target);
        }
        if let Some(channel) = &self.channel {
            alert = alert.to_channel(channel);
        }
        if let Some(username) = &self.username {
            alert = alert.with_username(username);
        }
        if let Some(icon_url) = &self.icon_url {
            alert = alert.with_icon_url(icon_url);
        }
        if let Some(icon_emoji) = &self.icon_emoji {
            alert = alert.with_icon_emoji(icon_emoji);
        }
        if let Some(queue) = &self.queue {
            alert = alert.on_queue(queue);
        }
        if let Some(sync) = self.sync_override() {
            alert = alert.sync(sync);
        }
        alert
    }
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut dict = Dict::new();

        // Only an explicit `--disabled` overrides; absence keeps the file's value.
        if self.disabled {
            dict.insert("enabled".into(), Value::from(false));
        }

        if let Some(level) = &self.log_level {
            dict.insert("log_level".into(), Value::from(level.clone()));
        }

        let mut map = Map::new();
        map.insert(Profile::Default, dict);
        Ok(map)
    }
}
