use crate::config::LoggingConfig;
use crate::domains::logger::{DomainLogger, DynLogger};
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
enum Level {
    Info,
    Warn,
    Error,
}

/// Fans board reports out to every configured sink. With no sinks it
/// discards everything.
#[derive(Default)]
pub struct MultiLogger {
    sinks: Vec<DynLogger>,
}

impl MultiLogger {
    pub fn new(sinks: Vec<DynLogger>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: DynLogger) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    fn emit(&self, level: Level, msg: &str) {
        for sink in &self.sinks {
            match level {
                Level::Info => sink.info(msg),
                Level::Warn => sink.warn(msg),
                Level::Error => sink.error(msg),
            }
        }
    }
}

impl DomainLogger for MultiLogger {
    fn info(&self, msg: &str) {
        self.emit(Level::Info, msg);
    }

    fn warn(&self, msg: &str) {
        self.emit(Level::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.emit(Level::Error, msg);
    }
}

/// Board logger for the tracker process, built from the `[logging]`
/// section. A file that cannot be opened is reported and skipped.
pub fn init_board_logger(config: &LoggingConfig) -> DynLogger {
    let mut logger = MultiLogger::default();

    if let Some(path) = config.file.as_deref() {
        match crate::adapters::outbound::init_file_logger(path) {
            Ok(file_logger) => logger.push(file_logger),
            Err(e) => tracing::warn!("{}; board reports will not be written to {}", e, path),
        }
    }
    if config.console {
        logger.push(crate::adapters::outbound::init_tracing_logger());
    }
    if logger.is_empty() {
        tracing::info!("Board reports are disabled");
    }

    Arc::new(logger)
}
