pub mod bus;
pub mod error;
pub mod routing;

pub use bus::*;
pub use error::*;
pub use routing::*;
