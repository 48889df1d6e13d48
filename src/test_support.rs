//! Scripted simulator double for unit tests.

use std::collections::VecDeque;

use crate::{
    Error, Result,
    arena::{ArenaSize, CombatEvent, Telemetry},
    ports::Simulator,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Ahead(f64),
    Back(f64),
    TurnLeft(f64),
    TurnRight(f64),
    TurnGunLeft(f64),
    TurnGunRight(f64),
    Fire(f64),
}

/// Records every command and replays a fixed event script.
///
/// After the n-th command the n-th batch of `script` is queued. When
/// `end_after` commands have run, `BattleEnded` is queued and any further
/// command fails.
#[derive(Debug, Default)]
pub struct ScriptedSimulator {
    pub arena: ArenaSize,
    pub telemetry: Telemetry,
    pub commands: Vec<Command>,
    pub script: VecDeque<Vec<CombatEvent>>,
    pub end_after: Option<usize>,
    pub radar_configured: bool,
    pending: Vec<CombatEvent>,
    ended: bool,
}

impl ScriptedSimulator {
    pub fn ending_after(commands: usize) -> Self {
        Self {
            end_after: Some(commands),
            ..Self::default()
        }
    }

    pub fn with_script(mut self, batches: Vec<Vec<CombatEvent>>) -> Self {
        self.script = batches.into();
        self
    }

    fn execute(&mut self, command: Command) -> Result<()> {
        if self.ended {
            return Err(Error::BattleOver {
                command: format!("{command:?}"),
            });
        }
        self.commands.push(command);
        if let Some(batch) = self.script.pop_front() {
            self.pending.extend(batch);
        }
        if self.end_after == Some(self.commands.len()) {
            self.pending.push(CombatEvent::BattleEnded);
            self.ended = true;
        }
        Ok(())
    }
}

impl Simulator for ScriptedSimulator {
    fn arena(&self) -> ArenaSize {
        self.arena
    }

    fn telemetry(&self) -> Telemetry {
        self.telemetry
    }

    fn configure_radar(&mut self) -> Result<()> {
        self.radar_configured = true;
        Ok(())
    }

    fn ahead(&mut self, distance: f64) -> Result<()> {
        self.execute(Command::Ahead(distance))
    }

    fn back(&mut self, distance: f64) -> Result<()> {
        self.execute(Command::Back(distance))
    }

    fn turn_left(&mut self, degrees: f64) -> Result<()> {
        self.execute(Command::TurnLeft(degrees))
    }

    fn turn_right(&mut self, degrees: f64) -> Result<()> {
        self.execute(Command::TurnRight(degrees))
    }

    fn turn_gun_left(&mut self, degrees: f64) -> Result<()> {
        self.execute(Command::TurnGunLeft(degrees))
    }

    fn turn_gun_right(&mut self, degrees: f64) -> Result<()> {
        self.execute(Command::TurnGunRight(degrees))
    }

    fn fire(&mut self, power: f64) -> Result<()> {
        self.execute(Command::Fire(power))
    }

    fn drain_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.pending)
    }
}
