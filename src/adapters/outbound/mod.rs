pub mod file_logger;
pub mod in_memory_bus;
#[cfg(feature = "kafka")]
pub mod kafka;
pub mod multi_logger;
pub mod tracing_logger;

pub use file_logger::*;
pub use in_memory_bus::*;
#[cfg(feature = "kafka")]
pub use kafka::*;
pub use multi_logger::*;
pub use tracing_logger::*;
