use crate::domains::tracking::{Grid, RecomputeMode, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bus: BusConfig,
    pub exchanges: ExchangeConfig,
    pub board: BoardConfig,
    pub tracker: TrackerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusKind {
    Memory,
    Kafka,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    pub kind: BusKind,
    pub brokers: Vec<String>,
    pub client_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    pub position: String,
    pub query: String,
    pub query_response: String,
    pub query_routing_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub width: u32,
    pub height: u32,
    pub recompute_mode: RecomputeMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Capacity of the queue in front of the board worker.
    pub command_buffer: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Forward board reports to the tracing subscriber.
    pub console: bool,
    /// When set, board reports also go to this file through fast_log.
    pub file: Option<String>,
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.board.width == 0 || self.board.height == 0 {
            bail!(
                "board dimensions must be positive, got {}x{}",
                self.board.width,
                self.board.height
            );
        }
        if self.tracker.command_buffer == 0 {
            bail!("tracker.command_buffer must be at least 1");
        }
        if self.exchanges.position == self.exchanges.query {
            bail!(
                "exchanges.position and exchanges.query must differ, both are '{}'",
                self.exchanges.query
            );
        }
        if self.exchanges.query_routing_key.is_empty() {
            bail!("exchanges.query_routing_key must not be empty");
        }
        if self.bus.kind == BusKind::Kafka && self.bus.brokers.is_empty() {
            bail!("bus.brokers must list at least one broker for the kafka bus");
        }
        Ok(())
    }

    pub fn grid(&self) -> Result<Grid> {
        Ok(Grid::new(self.board.width, self.board.height)?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bus: BusConfig::default(),
            exchanges: ExchangeConfig::default(),
            board: BoardConfig::default(),
            tracker: TrackerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            kind: BusKind::Memory,
            brokers: vec!["localhost:9092".to_string()],
            client_id: "contact-tracker".to_string(),
        }
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            position: "position".to_string(),
            query: "query".to_string(),
            query_response: "query-response".to_string(),
            query_routing_key: "query".to_string(),
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            recompute_mode: RecomputeMode::Complete,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            console: true,
            file: None,
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            command_buffer: 100,
        }
    }
}
