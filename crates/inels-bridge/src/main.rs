//! iNELS bridge
//!
//! Loads the configured devices, runs the entity platforms over them and
//! logs every entity state change until interrupted.
//!
//! Usage: `inels-bridge [CONFIG_DIR] [FILE]`, defaulting to `.` and `inels.yaml`.

mod bridge;

use anyhow::{Context, Result};
use inels_config::load_config;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::bridge::Bridge;

const DEFAULT_CONFIG_FILE: &str = "inels.yaml";

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let config_dir = PathBuf::from(args.next().unwrap_or_else(|| ".".to_string()));
    let config_file = args.next().unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

    let config = load_config(&config_dir, &config_file)
        .with_context(|| format!("loading {}", config_dir.join(&config_file).display()))?;

    // RUST_LOG wins over the configured default
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logger.default))
        .context("invalid logger.default filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "Starting iNELS bridge");

    let bridge = Bridge::start(&config)?;
    let watcher = tokio::spawn(bridge.clone().watch());

    info!(entities = bridge.entity_count(), "iNELS bridge is running");

    tokio::signal::ctrl_c().await?;
    info!("Shutting down...");

    watcher.abort();
    bridge.stop();
    Ok(())
}
