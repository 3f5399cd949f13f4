//! FitTrack Library
//!
//! Core functionality for fitness, nutrition, and challenge tracking.

pub mod analytics;
pub mod build_info;
pub mod db;
pub mod mcp;
pub mod models;
pub mod tools;
