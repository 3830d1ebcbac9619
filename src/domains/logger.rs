use std::sync::Arc;

/// Port through which the board reports what happened to it.
///
/// Reporting never fails from the caller's point of view.
pub trait DomainLogger: Send + Sync + 'static {
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

pub type DynLogger = Arc<dyn DomainLogger>;
