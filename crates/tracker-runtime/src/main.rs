//! # Filter-Trace Tracker Runtime
//!
//! Serves the lifecycle and projection engines over stdin/stdout.
//!
//! ## Startup Sequence
//!
//! 1. Install logging (stderr, `FT_LOG` filter)
//! 2. Load configuration (defaults + environment)
//! 3. Validate configuration
//! 4. Open the ledger and wire the engines
//! 5. Serve one JSON command per line until stdin closes, each on its own
//!    task

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tracker_runtime::{load_config, serve, CommandHandler, EngineContainer, VERSION};

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_env("FT_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    info!("===========================================");
    info!("  Filter-Trace Tracker Runtime v{}", VERSION);
    info!("===========================================");

    let config = load_config();
    config.validate().context("Invalid configuration")?;

    let container = EngineContainer::new(config).context("Failed to open ledger")?;
    let handler = CommandHandler::new(Arc::new(container));

    info!("[runtime] ready, reading commands from stdin");
    serve(
        Arc::new(handler),
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await?;

    info!("[runtime] stdin closed, shutting down");
    Ok(())
}
