use anyhow::{Context, Result};
use contact_tracker::adapters::outbound::{init_board_logger, InMemoryBus};
use contact_tracker::application::Tracker;
use contact_tracker::common::MessageBus;
use contact_tracker::config::{BusKind, Config};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Installed directly rather than via `init()` so the `log` facade stays
    // free for the fast_log file logger.
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting contact tracker");

    let config_path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let config = load_config(&config_path).await?;

    info!("Bus: {:?} {:?}", config.bus.kind, config.bus.brokers);
    info!(
        "Board: {}x{} ({:?})",
        config.board.width, config.board.height, config.board.recompute_mode
    );

    let logger = init_board_logger(&config.logging);
    let bus = connect_bus(&config)?;

    let tracker = Tracker::start(&config, bus, logger)
        .await
        .context("failed to start tracker")?;

    info!("Press Ctrl-C to exit");
    tokio::signal::ctrl_c().await?;
    info!("Shutting down contact tracker");

    let board = tracker.shutdown().await?;
    info!("Discarding {} agents", board.len());
    tracing::debug!("Final board: {}", serde_json::to_string(&board.snapshot())?);

    Ok(())
}

async fn load_config(path: &str) -> Result<Config> {
    if !Path::new(path).exists() {
        warn!("{} not found, using default configuration", path);
        return Ok(Config::default());
    }
    let config = Config::from_file(path)
        .await
        .with_context(|| format!("failed to load {}", path))?;
    info!("Configuration loaded from {}", path);
    Ok(config)
}

fn connect_bus(config: &Config) -> Result<Arc<dyn MessageBus>> {
    match config.bus.kind {
        BusKind::Memory => {
            warn!("Using the in-memory bus; only publishers inside this process are heard");
            Ok(Arc::new(InMemoryBus::new()))
        }
        BusKind::Kafka => kafka_bus(config),
    }
}

#[cfg(feature = "kafka")]
fn kafka_bus(config: &Config) -> Result<Arc<dyn MessageBus>> {
    let bus = contact_tracker::adapters::outbound::KafkaBus::new(&config.bus)?;
    Ok(Arc::new(bus))
}

#[cfg(not(feature = "kafka"))]
fn kafka_bus(_config: &Config) -> Result<Arc<dyn MessageBus>> {
    anyhow::bail!("bus.kind = \"kafka\" requires building with the `kafka` feature")
}
