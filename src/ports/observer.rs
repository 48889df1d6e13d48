//! Observer port - abstraction for watching battles and learning steps
//!
//! This port defines the interface for observing training events,
//! allowing composable data collection without coupling the learning loop
//! to specific output formats or metrics.

use crate::{
    Result,
    ports::robot::{BattleReport, RoundOutcome},
    sarsa::StepRecord,
};

/// Observer trait for monitoring battles
///
/// Observers can be composed to collect different types of data:
/// - Progress bars for user feedback
/// - JSONL export of every learning step
/// - Aggregate win/death metrics
///
/// # Event Sequence
///
/// 1. `on_training_start(total_battles)` - Once at the beginning
/// 2. For each battle:
///    a. `on_battle_start(battle_num)`
///    b. During the battle, in simulator order:
///       - `on_step(...)` - After each learning update
///       - `on_round_end(...)` - When a round is won or lost
///    c. `on_battle_end(battle_num, report)` - Once the host ends the battle
/// 3. `on_training_end()` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use robosarsa::ports::{Observer, RoundOutcome};
///
/// struct WinCounter {
///     wins: usize,
/// }
///
/// impl Observer for WinCounter {
///     fn on_round_end(&mut self, outcome: RoundOutcome) -> robosarsa::Result<()> {
///         if outcome == RoundOutcome::Win {
///             self.wins += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called once before the first battle.
    fn on_training_start(&mut self, _total_battles: usize) -> Result<()> {
        Ok(())
    }

    /// Called before the first command of a battle.
    fn on_battle_start(&mut self, _battle_num: usize) -> Result<()> {
        Ok(())
    }

    /// Called after every learning update.
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to trace individual transitions.
    fn on_step(&mut self, _step: &StepRecord) -> Result<()> {
        Ok(())
    }

    /// Called when the simulator reports a win or a death.
    fn on_round_end(&mut self, _outcome: RoundOutcome) -> Result<()> {
        Ok(())
    }

    /// Called once the battle has ended and the robot has returned.
    fn on_battle_end(&mut self, _battle_num: usize, _report: &BattleReport) -> Result<()> {
        Ok(())
    }

    /// Called once after the last battle.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl Observer for NullObserver {}
