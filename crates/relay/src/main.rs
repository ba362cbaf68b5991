//! firetap - Bluesky firehose relay
//!
//! # Usage
//!
//! ```bash
//! # Run with defaults (public Jetstream, public AppView)
//! firetap
//!
//! # Run with a config file
//! firetap --config configs/config.toml
//! ```

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::sync::Notify;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use firetap::{Config, Relay};
use firetap_config::{LogConfig, LogFormat};

/// firetap - Bluesky firehose relay
#[derive(Parser, Debug)]
#[command(name = "firetap")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file; defaults apply if the file is absent
    #[arg(short, long, default_value = "configs/config.toml")]
    config: std::path::PathBuf,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = if cli.config.exists() {
        Config::from_file(&cli.config)?
    } else {
        Config::default()
    };
    init_logging(&config.log, cli.log_level.as_deref())?;
    info!(config = %cli.config.display(), "starting firetap");

    let relay = Relay::new(&config)?;

    let shutdown = Arc::new(Notify::new());
    spawn_signal_handler(Arc::clone(&shutdown));

    relay.run(shutdown).await;
    info!("firetap stopped");
    Ok(())
}

/// Initialize the tracing subscriber for logging
fn init_logging(config: &LogConfig, override_level: Option<&str>) -> Result<()> {
    let level = override_level.unwrap_or(config.level.as_str());
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Console => registry
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .init(),
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
    }

    Ok(())
}

/// Turn ctrl-c into a notification every waiting task observes.
fn spawn_signal_handler(shutdown: Arc<Notify>) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install ctrl-c handler");
            return;
        }
        info!("shutdown requested");
        shutdown.notify_waiters();
    });
}
