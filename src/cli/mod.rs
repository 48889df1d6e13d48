//! CLI infrastructure for the SARSA robot
//!
//! This module provides the command-line interface for training the robot in
//! the sandbox arena, comparing it with the baseline, and inspecting what it
//! has learned.

pub mod commands;
pub mod output;

use tracing_subscriber::filter::EnvFilter;

/// Log filter from `RUST_LOG`-style directives, `info` when absent or invalid.
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}
