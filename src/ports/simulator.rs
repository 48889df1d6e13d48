//! Simulator port - the battle host seen from inside a robot.

use crate::{
    Result,
    arena::{ArenaSize, CombatEvent, Telemetry},
};

/// Port to the turn-based battle simulator.
///
/// Every command primitive blocks until the simulator has advanced simulated
/// time far enough to finish it (at least one tick). While time advances the
/// simulator queues [`CombatEvent`]s; robots pull them with
/// [`Simulator::drain_events`] at points of their own choosing instead of
/// receiving callbacks.
///
/// # Errors
///
/// Command primitives fail with [`crate::Error::BattleOver`] once the battle
/// has ended.
///
/// # Examples
///
/// ```no_run
/// use robosarsa::ports::Simulator;
///
/// fn spin_and_shoot(sim: &mut dyn Simulator) -> robosarsa::Result<()> {
///     sim.turn_gun_right(90.0)?;
///     sim.fire(1.0)?;
///     for event in sim.drain_events() {
///         println!("{event:?}");
///     }
///     Ok(())
/// }
/// ```
pub trait Simulator {
    /// Battlefield dimensions for the current battle.
    fn arena(&self) -> ArenaSize;

    /// Own-robot telemetry at the current tick.
    fn telemetry(&self) -> Telemetry;

    /// One-time engine setup at the start of a battle.
    ///
    /// Decouples gun and radar from body rotation and keeps the radar
    /// spinning so every opponent is scanned each tick.
    ///
    /// # Default Implementation
    ///
    /// Does nothing, for hosts whose radar is always on.
    fn configure_radar(&mut self) -> Result<()> {
        Ok(())
    }

    fn ahead(&mut self, distance: f64) -> Result<()>;

    fn back(&mut self, distance: f64) -> Result<()>;

    fn turn_left(&mut self, degrees: f64) -> Result<()>;

    fn turn_right(&mut self, degrees: f64) -> Result<()>;

    fn turn_gun_left(&mut self, degrees: f64) -> Result<()>;

    fn turn_gun_right(&mut self, degrees: f64) -> Result<()>;

    /// Fire a bullet from the gun. The host clamps `power` to its legal range.
    fn fire(&mut self, power: f64) -> Result<()>;

    /// Take every event queued since the previous drain, oldest first.
    fn drain_events(&mut self) -> Vec<CombatEvent>;
}
