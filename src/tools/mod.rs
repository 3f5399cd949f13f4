//! Tool implementations
//!
//! Business logic behind the MCP tools, independent of the protocol layer.

pub mod challenges;
pub mod checkins;
pub mod dashboard;
pub mod exercises;
pub mod meals;
pub mod status;

pub use status::{ServiceStatus, StatusTracker, DASHBOARD_INSTRUCTIONS};
