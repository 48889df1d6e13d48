//! Battle pipeline: runs a robot through a series of sandbox battles

use serde::{Deserialize, Serialize};
use tracing::info;

use super::observers::ObserverSet;
use crate::{
    Result,
    arena::{SandboxArena, SandboxConfig},
    ports::{BattleReport, Observer, Robot},
};

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of battles to run
    pub battles: usize,

    /// Arena rules; its seed is offset by the battle index for each battle
    pub arena: SandboxConfig,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            battles: 10,
            arena: SandboxConfig::default(),
        }
    }
}

impl TrainingConfig {
    fn arena_for(&self, battle_num: usize) -> SandboxConfig {
        let seed = self
            .arena
            .seed
            .map(|seed| seed.wrapping_add(battle_num as u64));
        self.arena.clone().with_seed(seed)
    }
}

/// Result of a series of battles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Robot name
    pub robot: String,

    /// Battles played
    pub battles: usize,

    /// Rounds won
    pub wins: u32,

    /// Rounds lost
    pub deaths: u32,

    /// Wins over decided rounds
    pub win_rate: f64,

    /// Commands issued
    pub steps: u64,

    /// Sum of all rewards
    pub total_reward: f64,
}

impl TrainingResult {
    /// Tally per-battle reports
    pub fn from_reports(robot: impl Into<String>, reports: &[BattleReport]) -> Self {
        let wins: u32 = reports.iter().map(|r| r.wins).sum();
        let deaths: u32 = reports.iter().map(|r| r.deaths).sum();
        let decided = wins + deaths;
        Self {
            robot: robot.into(),
            battles: reports.len(),
            wins,
            deaths,
            win_rate: if decided > 0 {
                f64::from(wins) / f64::from(decided)
            } else {
                0.0
            },
            steps: reports.iter().map(|r| r.steps).sum(),
            total_reward: reports.iter().map(|r| r.total_reward).sum(),
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Runs one robot through `battles` fresh sandbox battles.
///
/// The robot is kept across battles, so a learning robot carries its table
/// from one battle into the next.
pub struct BattlePipeline {
    config: TrainingConfig,
    observers: ObserverSet,
}

impl BattlePipeline {
    /// Create a new battle pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: ObserverSet::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run every battle and tally the robot's reports.
    ///
    /// # Errors
    ///
    /// Stops at the first battle that fails, e.g. when a learning robot
    /// cannot persist its table.
    pub fn run(&mut self, robot: &mut dyn Robot) -> Result<TrainingResult> {
        self.config.arena.validate()?;
        self.observers.on_training_start(self.config.battles)?;

        let mut reports = Vec::with_capacity(self.config.battles);
        for battle_num in 0..self.config.battles {
            let mut arena = SandboxArena::new(self.config.arena_for(battle_num))?;

            self.observers.on_battle_start(battle_num)?;
            let report = robot.run_battle(&mut arena, &mut self.observers)?;
            self.observers.on_battle_end(battle_num, &report)?;

            info!(
                robot = robot.name(),
                battle = battle_num + 1,
                wins = report.wins,
                deaths = report.deaths,
                steps = report.steps,
                "battle finished"
            );
            reports.push(report);
        }

        self.observers.on_training_end()?;
        Ok(TrainingResult::from_reports(robot.name(), &reports))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{arena::OpponentStyle, baseline::SimpleRobot, sarsa::SarsaAgent};

    fn quick_config(seed: u64) -> TrainingConfig {
        TrainingConfig {
            battles: 2,
            arena: SandboxConfig::default()
                .with_rounds(2)
                .with_tick_limit(300)
                .with_seed(Some(seed)),
        }
    }

    #[test]
    fn test_battle_pipeline_runs_all_battles() {
        let mut pipeline = BattlePipeline::new(quick_config(42));
        let mut agent = SarsaAgent::builder().seed(42).build();

        let result = pipeline.run(&mut agent).unwrap();

        assert_eq!(result.battles, 2);
        assert_eq!(result.robot, "SARSA");
        assert!(result.steps > 0);
        assert!(result.wins + result.deaths <= 4);
        assert_eq!(agent.metadata().battles, 2);
        assert!(!agent.table().is_empty());
    }

    #[test]
    fn test_same_seed_gives_same_result() {
        let run = || {
            let mut agent = SarsaAgent::builder().seed(5).build();
            BattlePipeline::new(quick_config(5)).run(&mut agent).unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_baseline_runs_through_pipeline() {
        let mut config = quick_config(8);
        config.arena = config.arena.with_opponent_style(OpponentStyle::SittingDuck);
        let mut robot = SimpleRobot::new(Some(8));
        let result = BattlePipeline::new(config).run(&mut robot).unwrap();
        assert_eq!(result.robot, "Simple");
        assert_eq!(result.deaths, 0);
    }

    #[test]
    fn test_invalid_arena_is_rejected_before_running() {
        let mut config = quick_config(1);
        config.arena.rounds = 0;
        let mut agent = SarsaAgent::builder().build();
        assert!(BattlePipeline::new(config).run(&mut agent).is_err());
        assert_eq!(agent.metadata().battles, 0);
    }

    #[test]
    fn test_result_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let result = TrainingResult::from_reports(
            "SARSA",
            &[BattleReport {
                wins: 3,
                deaths: 1,
                steps: 50,
                total_reward: 12.5,
            }],
        );
        result.save(&path).unwrap();
        assert_eq!(TrainingResult::load(&path).unwrap(), result);
        assert_eq!(result.win_rate, 0.75);
    }
}
