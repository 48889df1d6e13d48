//! Ports (trait boundaries) for external dependencies.
//!
//! This module defines the interfaces between the learning core and the
//! outside world: the battle simulator, knowledge storage, and anything that
//! wants to watch training.

pub mod observer;
pub mod repository;
pub mod robot;
pub mod simulator;

pub use observer::{NullObserver, Observer};
pub use repository::TableRepository;
pub use robot::{BattleReport, Robot, RoundOutcome};
pub use simulator::Simulator;
