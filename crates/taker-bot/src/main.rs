//! Paradigm FSPD auto-taker - Entry Point
//!
//! Lists the venue's strategies once, then submits a BUY and a SELL market
//! order for each of them every round, pausing a jittered interval between
//! rounds.

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};

/// Paradigm FSPD auto-taker
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via FSPD_TAKER_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// Stop after this many rounds (overrides `max_rounds`)
    #[arg(short, long)]
    rounds: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config before logging: the log level comes from it.
    let config_path = taker_bot::AppConfig::resolve_path(args.config);
    let mut config = taker_bot::AppConfig::load(&config_path)?;
    if args.rounds.is_some() {
        config.max_rounds = args.rounds;
    }

    taker_telemetry::init_logging(&config.telemetry.log_level)?;

    info!("Starting FSPD auto-taker v{}", env!("CARGO_PKG_VERSION"));
    if !taker_bot::AppConfig::file_exists(&config_path) {
        warn!(config_path = %config_path, "Config file not found, using defaults and environment");
    }
    info!(?config, "Configuration loaded");

    let mut app = taker_bot::Application::new(config).map_err(log_fatal)?;
    app.bootstrap().await?;
    app.run().await?;

    Ok(())
}

fn log_fatal(e: taker_bot::AppError) -> taker_bot::AppError {
    error!(error = %e, "Startup failed");
    e
}
