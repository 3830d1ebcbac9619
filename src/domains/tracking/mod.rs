pub mod actors;
pub mod board;
pub mod contacts;
pub mod events;
pub mod grid;

pub use actors::*;
pub use board::*;
pub use contacts::*;
pub use events::*;
pub use grid::*;
