//! slack-alerts - send an alert to a Slack incoming webhook from the command line.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use serde_json::Value;
use slack_alerts::{
    build_alerts,
    cli::{Cli, Command},
    config::Config,
    Dispatch, SkipReason,
};
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command.clone() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    // Load configuration by layering sources: defaults, file, environment, and CLI args.
    let config = Config::load(&cli).context("failed to load configuration")?;

    // RUST_LOG wins over the configured level.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        enabled = config.enabled,
        targets = ?config.webhook_urls.keys().collect::<Vec<_>>(),
        job = ?config.job,
        queue = %config.queue,
        sync = config.sync,
        "Configuration loaded"
    );

    let (alerts, queue) = build_alerts(&config);
    let alert = cli.apply(alerts.alert());

    let result = match command {
        Command::Message { text } => alert.message(text).await,
        Command::Blocks { file } => {
            let blocks = read_blocks(&file)?;
            alert.blocks(blocks).await
        }
    };

    // Let queued deliveries finish before the process exits.
    queue.shutdown().await;

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) if e.is_configuration_error() => {
            return Err(e)
                .context("nothing was sent; check `webhook_urls` and `job` in the configuration");
        }
        Err(e) => return Err(e.into()),
    };

    if !outcome.is_dispatched() {
        let reason = match outcome {
            Dispatch::Skipped(SkipReason::Disabled) => "alerts are disabled",
            _ => "no webhook URL is configured for the target",
        };
        warn!(reason, "Nothing was sent.");
        return Ok(());
    }

    match outcome {
        Dispatch::Queued { queue } => info!(queue = %queue, "Alert queued."),
        _ => info!("Alert delivered."),
    }

    Ok(())
}

/// Reads a JSON array of Slack blocks from a file, or stdin for "-".
fn read_blocks(path: &Path) -> Result<Vec<Value>> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read blocks from {}", path.display()))?
    };

    serde_json::from_str(&raw).context("blocks must be a JSON array of block objects")
}
