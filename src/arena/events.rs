//! Events the simulator queues while a command executes

use serde::{Deserialize, Serialize};

use super::telemetry::OpponentScan;

/// Something that happened during the last command.
///
/// The simulator only queues these; the learning loop drains the queue after
/// every command and routes each event to the scan buffer, the reward
/// accumulator, or persistence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CombatEvent {
    ScannedRobot(OpponentScan),
    /// An incoming bullet struck our robot
    HitByBullet { power: f64 },
    /// Our bullet struck another robot
    BulletHit { power: f64 },
    Death,
    Win,
    BattleEnded,
}

impl CombatEvent {
    /// Whether this event closes the current round.
    pub fn ends_round(&self) -> bool {
        matches!(self, CombatEvent::Death | CombatEvent::Win)
    }
}
