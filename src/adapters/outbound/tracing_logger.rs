use crate::domains::logger::DomainLogger;
use std::sync::Arc;

const TARGET: &str = "contact_tracker::board";

struct TracingBridge;

impl DomainLogger for TracingBridge {
    fn info(&self, msg: &str) {
        tracing::info!(target: TARGET, "{}", msg);
    }

    fn warn(&self, msg: &str) {
        tracing::warn!(target: TARGET, "{}", msg);
    }

    fn error(&self, msg: &str) {
        tracing::error!(target: TARGET, "{}", msg);
    }
}

/// Board reports routed into the process-wide tracing subscriber.
pub fn init_tracing_logger() -> Arc<dyn DomainLogger> {
    Arc::new(TracingBridge {})
}
