//! Battle pipeline abstractions
//!
//! This module provides composable pipelines for:
//! - Training a robot over a series of sandbox battles
//! - Comparing robots on identical battles
//! - Recording observations during training

pub mod comparison;
pub mod observers;
pub mod training;

pub use comparison::{ComparisonFramework, ComparisonResult};
pub use observers::{
    JsonlObserver, MetricsObserver, MetricsSummary, ObserverSet, ProgressObserver, SharedObserver,
};
pub use training::{BattlePipeline, TrainingConfig, TrainingResult};

pub use crate::ports::{Observer, Robot};
