//! SARSA-learning combat robot
//!
//! This crate provides:
//! - A tabular SARSA agent that learns from combat events between battles
//! - Exact-match observations grouped into equal-width buckets
//! - A deterministic sandbox arena for training without an external engine
//! - A scripted baseline robot for comparison
//! - Durable persistence of the learned table in MessagePack

pub mod action;
pub mod adapters;
pub mod app;
pub mod arena;
pub mod baseline;
pub mod cli;
pub mod error;
pub mod observation;
pub mod pipeline;
pub mod policy;
pub mod ports;
pub mod reward;
pub mod sarsa;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use action::{Action, ActionCatalog, ActionKind};
pub use error::{Error, Result};
pub use observation::{Discretizer, Observation};
pub use sarsa::{SarsaAgent, SarsaAgentBuilder};
pub use types::RobotId;
