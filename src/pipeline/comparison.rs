//! Comparison framework for evaluating several robots
//!
//! Every robot fights the same sequence of seeded sandbox battles, so win
//! rates are directly comparable.

use serde::{Deserialize, Serialize};

use super::training::{BattlePipeline, TrainingConfig, TrainingResult};
use crate::{Result, ports::Robot};

/// Results of a comparison, one entry per robot in insertion order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub results: Vec<TrainingResult>,
}

impl ComparisonResult {
    /// Robot with the highest win rate; the first one wins ties.
    pub fn leader(&self) -> Option<&TrainingResult> {
        self.results.iter().reduce(|best, candidate| {
            if candidate.win_rate > best.win_rate {
                candidate
            } else {
                best
            }
        })
    }

    pub fn get(&self, robot: &str) -> Option<&TrainingResult> {
        self.results.iter().find(|result| result.robot == robot)
    }
}

/// Runs each robot through identical battles
pub struct ComparisonFramework {
    robots: Vec<Box<dyn Robot>>,
    config: TrainingConfig,
}

impl ComparisonFramework {
    /// Create a new comparison framework
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            robots: Vec::new(),
            config,
        }
    }

    pub fn with_robot(mut self, robot: Box<dyn Robot>) -> Self {
        self.robots.push(robot);
        self
    }

    /// Run every robot through the configured battles
    pub fn compare(&mut self) -> Result<ComparisonResult> {
        let mut results = Vec::with_capacity(self.robots.len());
        for robot in &mut self.robots {
            let mut pipeline = BattlePipeline::new(self.config.clone());
            results.push(pipeline.run(robot.as_mut())?);
        }
        Ok(ComparisonResult { results })
    }
}
