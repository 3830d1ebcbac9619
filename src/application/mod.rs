pub mod dispatcher;
pub mod position_ingest;
pub mod query_service;
pub mod tracker;

pub use dispatcher::*;
pub use position_ingest::*;
pub use query_service::*;
pub use tracker::*;
