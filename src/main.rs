//! Scalper - Main Entry Point
//!
//! Runs the scalping strategy against Bitstamp on a fixed trade cycle until
//! Ctrl-C or a non-recoverable error.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use scalper::config::load_config;
use scalper::{BitstampRestClient, DryRunTradingApi, ScalpingStrategy, TradingApi, TradingEngine};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", env = "SCALPER_CONFIG")]
    config: String,

    /// Log level (trace, debug, info, warn, error), overrides engine.log_level
    #[arg(long)]
    log_level: Option<String>,

    /// Log orders instead of sending them
    #[arg(long)]
    dry_run: bool,
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let config = load_config(Some(args.config.as_str()))
        .with_context(|| format!("Failed to load configuration from {}", args.config))?;

    // Initialize logging
    let level = parse_level(args.log_level.as_deref().unwrap_or(&config.engine.log_level));
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting scalper");
    info!("Configuration file: {}", args.config);
    info!(
        exchange = %config.exchange.name,
        market = %config.market.name,
        strategy = %config.strategy.name,
        "Loaded configuration"
    );

    let client = BitstampRestClient::from_config(&config.exchange)
        .context("Failed to create exchange client")?;

    let api: Arc<dyn TradingApi> = if args.dry_run || config.exchange.dry_run {
        warn!("Dry run enabled - orders will be logged, not sent");
        Arc::new(DryRunTradingApi::new(client))
    } else {
        Arc::new(client)
    };

    let strategy = ScalpingStrategy::init(api, config.market.clone(), &config.strategy.config)
        .context("Failed to initialise trading strategy")?;

    let engine = TradingEngine::new(
        Box::new(strategy),
        Duration::from_secs(config.engine.trade_cycle_interval_seconds),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received shutdown signal, cleaning up...");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                warn!(error = %e, "Unable to listen for Ctrl-C");
                // Hold the sender so the engine keeps running
                std::future::pending::<()>().await;
                drop(shutdown_tx);
            }
        }
    });

    match engine.run(shutdown_rx).await {
        Ok(stats) => {
            info!(?stats, "Scalper stopped");
            Ok(())
        }
        Err(err) => {
            error!(error = %err, "Scalper stopped on a non-recoverable error");
            Err(err.into())
        }
    }
}
