//! Robot port - a complete control strategy for one battle

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    ports::{Observer, Simulator},
};

/// How a round finished for our robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundOutcome {
    Win,
    Death,
}

/// Tally of one battle from the robot's point of view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BattleReport {
    pub wins: u32,
    pub deaths: u32,
    /// Commands issued to the simulator
    pub steps: u64,
    /// Sum of all per-step rewards
    pub total_reward: f64,
}

impl BattleReport {
    pub fn record_round(&mut self, outcome: RoundOutcome) {
        match outcome {
            RoundOutcome::Win => self.wins += 1,
            RoundOutcome::Death => self.deaths += 1,
        }
    }

    /// Rounds that ended in a win or a death.
    pub fn decided_rounds(&self) -> u32 {
        self.wins + self.deaths
    }
}

/// A strategy that drives one robot through a whole battle.
///
/// Implemented by the learning agent and by the non-learning baseline so
/// both can be run by the same pipeline.
pub trait Robot {
    /// Short name used in reports.
    fn name(&self) -> &str;

    /// Control the robot until the simulator reports the battle has ended.
    ///
    /// # Errors
    ///
    /// Returns an error if the simulator fails or, for learning robots, if the
    /// learned state cannot be persisted.
    fn run_battle(
        &mut self,
        sim: &mut dyn Simulator,
        observer: &mut dyn Observer,
    ) -> Result<BattleReport>;
}
