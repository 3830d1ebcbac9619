use crate::domains::logger::DomainLogger;
use chrono::Utc;
use std::sync::Arc;

struct FileBridge;

impl DomainLogger for FileBridge {
    fn info(&self, msg: &str) {
        log::info!("{} - {}", Utc::now().to_rfc3339(), msg);
    }

    fn warn(&self, msg: &str) {
        log::warn!("{} - {}", Utc::now().to_rfc3339(), msg);
    }

    fn error(&self, msg: &str) {
        log::error!("{} - {}", Utc::now().to_rfc3339(), msg);
    }
}

/// Install fast_log as the `log` backend writing to `path` and return a
/// board logger that reports through it.
///
/// fast_log claims the global `log` logger, so this can succeed at most once
/// per process.
pub fn init_file_logger(path: &str) -> Result<Arc<dyn DomainLogger>, String> {
    fast_log::init(
        fast_log::config::Config::new()
            .file(path)
            .level(log::LevelFilter::Info),
    )
    .map_err(|e| format!("Failed to initialize fast_log: {}", e))?;
    Ok(Arc::new(FileBridge {}))
}
