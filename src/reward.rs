//! Reward accumulation: combat events collected during one command

use serde::{Deserialize, Serialize};

use crate::arena::CombatEvent;

/// Fixed rewards for round-ending events.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardSchedule {
    pub win: f64,
    pub death: f64,
}

impl Default for RewardSchedule {
    fn default() -> Self {
        Self {
            win: 200.0,
            death: -200.0,
        }
    }
}

impl RewardSchedule {
    /// Signed reward for `event`, or `None` if the event carries no reward.
    pub fn reward_for(&self, event: &CombatEvent) -> Option<f64> {
        match *event {
            CombatEvent::HitByBullet { power } => Some(-power),
            CombatEvent::BulletHit { power } => Some(power),
            CombatEvent::Win => Some(self.win),
            CombatEvent::Death => Some(self.death),
            CombatEvent::ScannedRobot(_) | CombatEvent::BattleEnded => None,
        }
    }
}

/// Pending rewards for the command currently executing.
///
/// Drained exactly once per command to produce that transition's reward.
#[derive(Debug, Clone, Default)]
pub struct RewardAccumulator {
    schedule: RewardSchedule,
    pending: Vec<f64>,
}

impl RewardAccumulator {
    pub fn new(schedule: RewardSchedule) -> Self {
        Self {
            schedule,
            pending: Vec::new(),
        }
    }

    /// Record `event`; returns whether it contributed a reward.
    pub fn on_event(&mut self, event: &CombatEvent) -> bool {
        match self.schedule.reward_for(event) {
            Some(reward) => {
                self.pending.push(reward);
                true
            }
            None => false,
        }
    }

    /// Sum and clear everything recorded since the last drain.
    pub fn drain_reward(&mut self) -> f64 {
        self.pending.drain(..).sum()
    }

    pub fn pending_events(&self) -> usize {
        self.pending.len()
    }
}
