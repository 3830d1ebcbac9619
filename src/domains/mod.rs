pub mod logger;
pub mod tracking;

pub use logger::*;
pub use tracking::*;
