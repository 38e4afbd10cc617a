//! CLI Module Organization
//!
//! - args: CLI argument structures
//! - commands: command execution
//! - config_layer: configuration layer management and merging

pub mod args;
pub mod commands;
pub mod config_layer;

// Re-export commonly used items for convenience
pub use args::*;
pub use commands::*;
