use contact_tracker::config::{BusKind, Config};
use contact_tracker::domains::tracking::RecomputeMode;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_default_config_matches_legacy_topology() {
    let config = Config::default();
    assert_eq!(config.bus.kind, BusKind::Memory);
    assert_eq!(config.exchanges.position, "position");
    assert_eq!(config.exchanges.query, "query");
    assert_eq!(config.exchanges.query_response, "query-response");
    assert_eq!(config.exchanges.query_routing_key, "query");
    assert_eq!((config.board.width, config.board.height), (10, 10));
    assert_eq!(config.board.recompute_mode, RecomputeMode::Complete);
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_toml_falls_back_to_defaults() {
    let config = Config::from_toml(
        r#"
        [board]
        width = 20
        recompute_mode = "legacy_early_return"
        "#,
    )
    .unwrap();

    assert_eq!(config.board.width, 20);
    assert_eq!(config.board.height, 10);
    assert_eq!(config.board.recompute_mode, RecomputeMode::LegacyEarlyReturn);
    assert_eq!(config.tracker.command_buffer, 100);
    assert!(config.logging.file.is_none());
}

#[test]
fn test_invalid_values_are_rejected() {
    assert!(Config::from_toml("[board]\nheight = 0\n").is_err());
    assert!(Config::from_toml("[tracker]\ncommand_buffer = 0\n").is_err());
    assert!(Config::from_toml("[bus]\nkind = \"kafka\"\nbrokers = []\n").is_err());
    assert!(Config::from_toml("[bus]\nkind = \"carrier-pigeon\"\n").is_err());
    assert!(Config::from_toml("[exchanges]\nposition = \"query\"\n").is_err());
}

#[test]
fn test_logging_defaults_to_console_only() {
    let config = Config::from_toml("[logging]\n").unwrap();
    assert!(config.logging.console);
    assert!(config.logging.file.is_none());

    let quiet = Config::from_toml("[logging]\nconsole = false\n").unwrap();
    assert!(!quiet.logging.console);
}

#[tokio::test]
async fn test_shipped_config_runs_on_the_default_build() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml");
    let config = Config::from_file(path).await.unwrap();

    if !cfg!(feature = "kafka") {
        assert_eq!(config.bus.kind, BusKind::Memory);
    }
    assert_eq!(config.exchanges.position, "position");
    assert_eq!(config.board.recompute_mode, RecomputeMode::Complete);
}

#[tokio::test]
async fn test_config_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[bus]
kind = "kafka"
brokers = ["broker-1:9092", "broker-2:9092"]
client_id = "tracker-test"

[exchanges]
query_routing_key = "contacts"

[logging]
file = "logs/tracker.log"
"#
    )
    .unwrap();

    let config = Config::from_file(file.path()).await.unwrap();
    assert_eq!(config.bus.kind, BusKind::Kafka);
    assert_eq!(config.bus.brokers.len(), 2);
    assert_eq!(config.exchanges.query_routing_key, "contacts");
    assert_eq!(config.exchanges.position, "position");
    assert_eq!(config.logging.file.as_deref(), Some("logs/tracker.log"));
    assert_eq!(config.grid().unwrap().width(), 10);
}

#[tokio::test]
async fn test_missing_file_is_an_error() {
    assert!(Config::from_file("/definitely/not/here.toml").await.is_err());
}
