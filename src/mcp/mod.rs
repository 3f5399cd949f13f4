//! MCP protocol layer

mod server;

pub use server::FittrackService;
