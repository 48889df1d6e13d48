//! Observer pattern for battle pipelines
//!
//! Observers allow composable data collection during training without coupling
//! the learning loop to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    policy::Choice,
    ports::{BattleReport, Observer, RoundOutcome},
    sarsa::StepRecord,
};

/// Forwards every hook to each observer in turn.
#[derive(Default)]
pub struct ObserverSet {
    observers: Vec<Box<dyn Observer>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl Observer for ObserverSet {
    fn on_training_start(&mut self, total_battles: usize) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_training_start(total_battles)?;
        }
        Ok(())
    }

    fn on_battle_start(&mut self, battle_num: usize) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_battle_start(battle_num)?;
        }
        Ok(())
    }

    fn on_step(&mut self, step: &StepRecord) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_step(step)?;
        }
        Ok(())
    }

    fn on_round_end(&mut self, outcome: RoundOutcome) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_round_end(outcome)?;
        }
        Ok(())
    }

    fn on_battle_end(&mut self, battle_num: usize, report: &BattleReport) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_battle_end(battle_num, report)?;
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_training_end()?;
        }
        Ok(())
    }
}

/// Observer behind a shared handle, so its state can still be read after
/// the pipeline has taken ownership of the box.
pub struct SharedObserver<T> {
    inner: Arc<Mutex<T>>,
}

impl<T: Observer> SharedObserver<T> {
    pub fn new(observer: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(observer)),
        }
    }

    pub fn handle(&self) -> Arc<Mutex<T>> {
        Arc::clone(&self.inner)
    }

    fn lock(&self) -> MutexGuard<'_, T> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T: Observer> Observer for SharedObserver<T> {
    fn on_training_start(&mut self, total_battles: usize) -> Result<()> {
        self.lock().on_training_start(total_battles)
    }

    fn on_battle_start(&mut self, battle_num: usize) -> Result<()> {
        self.lock().on_battle_start(battle_num)
    }

    fn on_step(&mut self, step: &StepRecord) -> Result<()> {
        self.lock().on_step(step)
    }

    fn on_round_end(&mut self, outcome: RoundOutcome) -> Result<()> {
        self.lock().on_round_end(outcome)
    }

    fn on_battle_end(&mut self, battle_num: usize, report: &BattleReport) -> Result<()> {
        self.lock().on_battle_end(battle_num, report)
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.lock().on_training_end()
    }
}

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    wins: usize,
    deaths: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            wins: 0,
            deaths: 0,
        }
    }

    fn message(&self) -> String {
        format!("W:{} D:{}", self.wins, self.deaths)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_battles: usize) -> Result<()> {
        let pb = ProgressBar::new(total_battles as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} battles ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_round_end(&mut self, outcome: RoundOutcome) -> Result<()> {
        match outcome {
            RoundOutcome::Win => self.wins += 1,
            RoundOutcome::Death => self.deaths += 1,
        }
        Ok(())
    }

    fn on_battle_end(&mut self, battle_num: usize, _report: &BattleReport) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.set_position(battle_num as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks training metrics
#[derive(Debug, Default)]
pub struct MetricsObserver {
    battles: usize,
    wins: usize,
    deaths: usize,
    steps: u64,
    total_reward: f64,
    explored: u64,
    greedy: u64,
    fallback: u64,
    battle_win_rates: Vec<f64>,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    /// Wins over decided rounds so far
    pub fn win_rate(&self) -> f64 {
        let decided = self.wins + self.deaths;
        if decided == 0 {
            0.0
        } else {
            self.wins as f64 / decided as f64
        }
    }

    /// Share of steps whose action came from the table
    pub fn greedy_rate(&self) -> f64 {
        if self.steps == 0 {
            0.0
        } else {
            self.greedy as f64 / self.steps as f64
        }
    }

    pub fn avg_reward_per_step(&self) -> f64 {
        if self.steps == 0 {
            0.0
        } else {
            self.total_reward / self.steps as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            battles: self.battles,
            wins: self.wins,
            deaths: self.deaths,
            win_rate: self.win_rate(),
            steps: self.steps,
            total_reward: self.total_reward,
            avg_reward_per_step: self.avg_reward_per_step(),
            explored: self.explored,
            greedy: self.greedy,
            fallback: self.fallback,
            greedy_rate: self.greedy_rate(),
            battle_win_rates: self.battle_win_rates.clone(),
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub battles: usize,
    pub wins: usize,
    pub deaths: usize,
    pub win_rate: f64,
    pub steps: u64,
    pub total_reward: f64,
    pub avg_reward_per_step: f64,
    pub explored: u64,
    pub greedy: u64,
    pub fallback: u64,
    pub greedy_rate: f64,
    /// Per-battle wins over decided rounds, in battle order
    pub battle_win_rates: Vec<f64>,
}

impl Observer for MetricsObserver {
    fn on_step(&mut self, step: &StepRecord) -> Result<()> {
        self.steps += 1;
        self.total_reward += step.reward;
        match step.choice {
            Choice::Explore => self.explored += 1,
            Choice::Greedy => self.greedy += 1,
            Choice::Fallback => self.fallback += 1,
        }
        Ok(())
    }

    fn on_round_end(&mut self, outcome: RoundOutcome) -> Result<()> {
        match outcome {
            RoundOutcome::Win => self.wins += 1,
            RoundOutcome::Death => self.deaths += 1,
        }
        Ok(())
    }

    fn on_battle_end(&mut self, _battle_num: usize, report: &BattleReport) -> Result<()> {
        self.battles += 1;
        let decided = report.decided_rounds();
        self.battle_win_rates.push(if decided == 0 {
            0.0
        } else {
            f64::from(report.wins) / f64::from(decided)
        });
        Ok(())
    }
}

#[derive(Serialize)]
struct StepLine<'a> {
    battle: usize,
    #[serde(flatten)]
    step: &'a StepRecord,
}

/// JSONL observer - Exports every learning step as one JSON line
pub struct JsonlObserver {
    writer: BufWriter<File>,
    current_battle: usize,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            current_battle: 0,
        })
    }
}

impl Observer for JsonlObserver {
    fn on_battle_start(&mut self, battle_num: usize) -> Result<()> {
        self.current_battle = battle_num;
        Ok(())
    }

    fn on_step(&mut self, step: &StepRecord) -> Result<()> {
        let line = StepLine {
            battle: self.current_battle,
            step,
        };
        serde_json::to_writer(&mut self.writer, &line)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_battle_end(&mut self, _battle_num: usize, _report: &BattleReport) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
