pub mod core;
pub mod exchange;
pub mod server;
pub mod tools;

pub use crate::core::config::HyperliquidConfig;
pub use crate::core::errors::{HyperliquidError, ToolError};
pub use crate::exchange::HyperliquidClient;
pub use crate::server::McpServer;
