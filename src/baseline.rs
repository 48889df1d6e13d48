//! Non-learning reference robot
//!
//! Roams and sweeps its gun until it sees someone, then fires at full power
//! while jiggling back and forth. When hit it turns across the line of fire
//! and runs. Used to put the learning agent's win rate into perspective.

use std::collections::VecDeque;

use rand::{Rng, rngs::StdRng};

use crate::{
    Result,
    action::{self, Action},
    arena::CombatEvent,
    policy::build_rng,
    ports::{BattleReport, Observer, Robot, RoundOutcome, Simulator},
    reward::RewardSchedule,
    types::relative_degrees,
};

const ROAM_DISTANCE: f64 = 100.0;
const JIGGLE_DISTANCE: f64 = 50.0;
const FIRE_POWER: f64 = 10.0;

/// What one command turned up.
#[derive(Debug, Default)]
struct Reaction {
    scanned: bool,
    hit_by_bullet: bool,
    bullet_hit: bool,
    battle_ended: bool,
}

/// Scripted robot with no memory between battles.
#[derive(Debug)]
pub struct SimpleRobot {
    rng: StdRng,
    rewards: RewardSchedule,
    engaged: bool,
    last_bearing: Option<f64>,
    plan: VecDeque<Action>,
}

impl SimpleRobot {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: build_rng(seed),
            rewards: RewardSchedule::default(),
            engaged: false,
            last_bearing: None,
            plan: VecDeque::new(),
        }
    }

    fn refill_plan(&mut self) {
        if self.engaged {
            self.plan.push_back(Action::Fire(FIRE_POWER));
            self.plan.push_back(if self.rng.random::<bool>() {
                Action::MoveForward(JIGGLE_DISTANCE)
            } else {
                Action::MoveBackward(JIGGLE_DISTANCE)
            });
        } else {
            self.plan.push_back(Action::MoveForward(ROAM_DISTANCE));
            self.plan.push_back(Action::TurnTurretRight(360.0));
        }
    }

    fn execute(
        &mut self,
        action: &Action,
        sim: &mut dyn Simulator,
        report: &mut BattleReport,
        observer: &mut dyn Observer,
    ) -> Result<Reaction> {
        action::apply(action, sim)?;
        report.steps += 1;

        let mut reaction = Reaction::default();
        for event in sim.drain_events() {
            if let Some(reward) = self.rewards.reward_for(&event) {
                report.total_reward += reward;
            }
            match event {
                CombatEvent::ScannedRobot(scan) => {
                    reaction.scanned = true;
                    self.last_bearing = Some(scan.bearing);
                }
                CombatEvent::HitByBullet { .. } => reaction.hit_by_bullet = true,
                CombatEvent::BulletHit { .. } => reaction.bullet_hit = true,
                CombatEvent::Win => {
                    report.record_round(RoundOutcome::Win);
                    observer.on_round_end(RoundOutcome::Win)?;
                }
                CombatEvent::Death => {
                    report.record_round(RoundOutcome::Death);
                    observer.on_round_end(RoundOutcome::Death)?;
                }
                CombatEvent::BattleEnded => reaction.battle_ended = true,
            }
        }
        Ok(reaction)
    }

    fn evade(&mut self) {
        // bullets carry no direction here, so dodge relative to the last contact
        let turn = relative_degrees(self.last_bearing.unwrap_or(0.0) + 90.0);
        self.plan.clear();
        self.plan.push_back(if turn < 0.0 {
            Action::TurnBodyLeft(-turn)
        } else {
            Action::TurnBodyRight(turn)
        });
        self.plan.push_back(Action::MoveForward(ROAM_DISTANCE));
        self.engaged = false;
    }

    pub fn run<S: Simulator>(
        &mut self,
        sim: &mut S,
        observer: &mut dyn Observer,
    ) -> Result<BattleReport> {
        self.run_battle(sim, observer)
    }
}

impl Robot for SimpleRobot {
    fn name(&self) -> &str {
        "Simple"
    }

    fn run_battle(
        &mut self,
        sim: &mut dyn Simulator,
        observer: &mut dyn Observer,
    ) -> Result<BattleReport> {
        self.engaged = false;
        self.plan.clear();
        sim.drain_events();

        let mut report = BattleReport::default();
        loop {
            if self.plan.is_empty() {
                self.refill_plan();
            }
            let Some(action) = self.plan.pop_front() else {
                continue;
            };

            let reaction = self.execute(&action, sim, &mut report, observer)?;
            if reaction.battle_ended {
                return Ok(report);
            }

            if matches!(action, Action::Fire(_)) && !reaction.bullet_hit {
                self.engaged = false;
            }
            if reaction.scanned && !self.engaged {
                self.engaged = true;
                self.plan.clear();
            }
            if reaction.hit_by_bullet {
                self.evade();
            }
        }
    }
}
