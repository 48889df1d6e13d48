//! Local battle simulator
//!
//! A small tick-based arena with Robocode-like rules, used to train and test
//! robots without an external host. Our robot is driven through the
//! [`Simulator`] port; the other robots follow a built-in script.

use rand::{Rng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    Error, Result,
    arena::{ArenaSize, CombatEvent, OpponentScan, Telemetry},
    policy::build_rng,
    ports::Simulator,
    types::{RobotId, normalize_degrees, relative_degrees},
};

// Movement
pub const MAX_SPEED: f64 = 8.0; // pixels per tick
pub const BODY_TURN_RATE: f64 = 10.0; // degrees per tick
pub const GUN_TURN_RATE: f64 = 20.0; // degrees per tick
pub const ROBOT_HALF_WIDTH: f64 = 18.0;

// Gunnery
pub const MIN_POWER: f64 = 0.1;
pub const MAX_POWER: f64 = 3.0;
pub const GUN_COOLING_RATE: f64 = 0.1; // heat removed per tick
pub const INITIAL_GUN_HEAT: f64 = 3.0;

pub const INITIAL_ENERGY: f64 = 100.0;

/// Damage dealt by a bullet of `power`.
pub fn bullet_damage(power: f64) -> f64 {
    4.0 * power + 2.0 * (power - 1.0).max(0.0)
}

/// Heat a gun gains from firing at `power`.
pub fn gun_heat(power: f64) -> f64 {
    1.0 + power / 5.0
}

/// Energy returned to the shooter when a bullet of `power` hits.
pub fn hit_bonus(power: f64) -> f64 {
    3.0 * power
}

fn clamp_power(power: f64) -> f64 {
    if power.is_nan() {
        MIN_POWER
    } else {
        power.clamp(MIN_POWER, MAX_POWER)
    }
}

/// Absolute bearing from one point to another, clockwise from north.
fn absolute_bearing(from: (f64, f64), to: (f64, f64)) -> f64 {
    normalize_degrees((to.0 - from.0).atan2(to.1 - from.1).to_degrees())
}

/// Distance along a bullet line at which it passes within the hit
/// tolerance of `target`, or `None` if it misses.
fn ray_hit(origin: (f64, f64), heading: f64, target: (f64, f64)) -> Option<f64> {
    let (sin, cos) = heading.to_radians().sin_cos();
    let (dx, dy) = (target.0 - origin.0, target.1 - origin.1);
    let along = dx * sin + dy * cos;
    let across = (dx * cos - dy * sin).abs();
    (along > 0.0 && across <= ROBOT_HALF_WIDTH).then_some(along)
}

/// How the built-in opponents behave.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpponentStyle {
    /// Wander about and shoot at our robot
    #[default]
    Wanderer,
    /// Never move or fire
    SittingDuck,
}

/// Arena rules for one battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    pub width: f64,
    pub height: f64,
    pub rounds: u32,
    pub opponents: u32,
    /// A round ends undecided after this many ticks
    pub tick_limit: u32,
    pub opponent_style: OpponentStyle,
    pub opponent_power: f64,
    /// Opponent shots deviate uniformly by up to this many degrees
    pub opponent_aim_error: f64,
    pub seed: Option<u64>,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            rounds: 10,
            opponents: 1,
            tick_limit: 2000,
            opponent_style: OpponentStyle::Wanderer,
            opponent_power: 1.0,
            opponent_aim_error: 15.0,
            seed: None,
        }
    }
}

impl SandboxConfig {
    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_opponents(mut self, opponents: u32) -> Self {
        self.opponents = opponents;
        self
    }

    pub fn with_tick_limit(mut self, tick_limit: u32) -> Self {
        self.tick_limit = tick_limit;
        self
    }

    pub fn with_opponent_style(mut self, style: OpponentStyle) -> Self {
        self.opponent_style = style;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn arena(&self) -> ArenaSize {
        ArenaSize::new(self.width, self.height)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(Error::InvalidConfiguration { message });
        let min_side = 4.0 * ROBOT_HALF_WIDTH;
        if !(self.width >= min_side && self.height >= min_side) {
            return invalid(format!(
                "arena must be at least {min_side}x{min_side}, got {}x{}",
                self.width, self.height
            ));
        }
        if self.rounds == 0 {
            return invalid("rounds must be at least 1".to_string());
        }
        if self.opponents == 0 {
            return invalid("at least one opponent is required".to_string());
        }
        if self.tick_limit == 0 {
            return invalid("tick_limit must be at least 1".to_string());
        }
        if !(MIN_POWER..=MAX_POWER).contains(&self.opponent_power) {
            return invalid(format!(
                "opponent_power must be in [{MIN_POWER}, {MAX_POWER}], got {}",
                self.opponent_power
            ));
        }
        if !(self.opponent_aim_error >= 0.0) {
            return invalid("opponent_aim_error must not be negative".to_string());
        }
        Ok(())
    }
}

/// Remaining scripted movement for an opponent.
#[derive(Debug, Clone, Copy, Default)]
struct MovePlan {
    turn: f64,
    distance: f64,
}

#[derive(Debug, Clone)]
struct Body {
    id: RobotId,
    x: f64,
    y: f64,
    heading: f64,
    gun_heading: f64,
    energy: f64,
    gun_heat: f64,
    plan: MovePlan,
}

impl Body {
    fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    fn alive(&self) -> bool {
        self.energy > 0.0
    }

    fn can_fire(&self, power: f64) -> bool {
        self.gun_heat <= 0.0 && self.energy > power
    }

    /// Spend energy and heat for a shot.
    fn discharge(&mut self, power: f64) {
        self.energy -= power;
        self.gun_heat = gun_heat(power);
    }

    /// Move along the body heading; returns false if a wall stopped us.
    fn advance(&mut self, distance: f64, arena: ArenaSize) -> bool {
        let (sin, cos) = self.heading.to_radians().sin_cos();
        let x = self.x + distance * sin;
        let y = self.y + distance * cos;
        self.x = x.clamp(ROBOT_HALF_WIDTH, arena.width - ROBOT_HALF_WIDTH);
        self.y = y.clamp(ROBOT_HALF_WIDTH, arena.height - ROBOT_HALF_WIDTH);
        self.x == x && self.y == y
    }

    fn turn(&mut self, degrees: f64, gun_follows: bool) {
        self.heading = normalize_degrees(self.heading + degrees);
        if gun_follows {
            self.gun_heading = normalize_degrees(self.gun_heading + degrees);
        }
    }
}

/// Tick-based local simulator.
///
/// # Examples
///
/// ```
/// use robosarsa::arena::{SandboxArena, SandboxConfig};
/// use robosarsa::ports::Simulator;
///
/// let mut arena = SandboxArena::new(SandboxConfig::default().with_seed(Some(1)))?;
/// arena.configure_radar()?;
/// arena.ahead(40.0)?;
/// assert!(!arena.drain_events().is_empty());
/// # Ok::<(), robosarsa::Error>(())
/// ```
#[derive(Debug)]
pub struct SandboxArena {
    config: SandboxConfig,
    rng: StdRng,
    agent: Body,
    opponents: Vec<Body>,
    gun_follows_body: bool,
    rounds_completed: u32,
    round_tick: u32,
    total_ticks: u64,
    events: Vec<CombatEvent>,
    over: bool,
}

impl SandboxArena {
    pub fn new(config: SandboxConfig) -> Result<Self> {
        config.validate()?;
        let rng = build_rng(config.seed);
        let placeholder = Body {
            id: RobotId::new(0),
            x: 0.0,
            y: 0.0,
            heading: 0.0,
            gun_heading: 0.0,
            energy: INITIAL_ENERGY,
            gun_heat: INITIAL_GUN_HEAT,
            plan: MovePlan::default(),
        };
        let opponents = (1..=config.opponents)
            .map(|id| Body {
                id: RobotId::new(id),
                ..placeholder.clone()
            })
            .collect();

        let mut arena = Self {
            config,
            rng,
            agent: placeholder,
            opponents,
            gun_follows_body: true,
            rounds_completed: 0,
            round_tick: 0,
            total_ticks: 0,
            events: Vec::new(),
            over: false,
        };
        arena.start_round();
        Ok(arena)
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// Current round, 1-based.
    pub fn round(&self) -> u32 {
        (self.rounds_completed + 1).min(self.config.rounds)
    }

    pub fn rounds_completed(&self) -> u32 {
        self.rounds_completed
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    pub fn opponents_alive(&self) -> usize {
        self.opponents.iter().filter(|body| body.alive()).count()
    }

    /// Reposition our robot, e.g. to set up a scripted scenario.
    pub fn place_agent(&mut self, x: f64, y: f64, heading: f64) {
        let arena = self.config.arena();
        self.agent.x = x.clamp(ROBOT_HALF_WIDTH, arena.width - ROBOT_HALF_WIDTH);
        self.agent.y = y.clamp(ROBOT_HALF_WIDTH, arena.height - ROBOT_HALF_WIDTH);
        self.agent.heading = normalize_degrees(heading);
        self.agent.gun_heading = self.agent.heading;
    }

    fn random_body_position(&mut self) -> (f64, f64, f64) {
        let margin = 2.0 * ROBOT_HALF_WIDTH;
        let x = self.rng.random_range(margin..=self.config.width - margin);
        let y = self.rng.random_range(margin..=self.config.height - margin);
        let heading = self.rng.random_range(0.0..360.0);
        (x, y, heading)
    }

    fn start_round(&mut self) {
        self.round_tick = 0;
        for index in 0..=self.opponents.len() {
            let (x, y, heading) = self.random_body_position();
            let body = if index == 0 {
                &mut self.agent
            } else {
                &mut self.opponents[index - 1]
            };
            body.x = x;
            body.y = y;
            body.heading = heading;
            body.gun_heading = heading;
            body.energy = INITIAL_ENERGY;
            body.gun_heat = INITIAL_GUN_HEAT;
            body.plan = MovePlan::default();
        }
    }

    fn end_round(&mut self, outcome: Option<CombatEvent>) {
        self.rounds_completed += 1;
        debug!(
            round = self.rounds_completed,
            ticks = self.round_tick,
            ?outcome,
            "round ended"
        );
        self.events.extend(outcome);
        if self.rounds_completed >= self.config.rounds {
            self.events.push(CombatEvent::BattleEnded);
            self.over = true;
        } else {
            self.start_round();
        }
    }

    /// Run a command one tick at a time until `step` reports it finished or
    /// the round ends underneath it.
    fn execute<F>(&mut self, command: &str, mut step: F) -> Result<()>
    where
        F: FnMut(&mut Self) -> bool,
    {
        if self.over {
            return Err(Error::BattleOver {
                command: command.to_string(),
            });
        }
        let round = self.rounds_completed;
        loop {
            let finished = step(self);
            self.tick();
            if finished || self.rounds_completed != round {
                return Ok(());
            }
        }
    }

    fn drive(&mut self, command: &str, distance: f64) -> Result<()> {
        let direction = distance.signum();
        let mut remaining = if distance.is_finite() { distance.abs() } else { 0.0 };
        let arena = self.config.arena();
        self.execute(command, |sandbox| {
            let step = remaining.min(MAX_SPEED);
            remaining -= step;
            let clear = sandbox.agent.advance(direction * step, arena);
            !clear || remaining <= 0.0
        })
    }

    fn rotate_body(&mut self, command: &str, degrees: f64) -> Result<()> {
        let direction = degrees.signum();
        let mut remaining = if degrees.is_finite() { degrees.abs() } else { 0.0 };
        self.execute(command, |sandbox| {
            let step = remaining.min(BODY_TURN_RATE);
            remaining -= step;
            let gun_follows = sandbox.gun_follows_body;
            sandbox.agent.turn(direction * step, gun_follows);
            remaining <= 0.0
        })
    }

    fn rotate_gun(&mut self, command: &str, degrees: f64) -> Result<()> {
        let direction = degrees.signum();
        let mut remaining = if degrees.is_finite() { degrees.abs() } else { 0.0 };
        self.execute(command, |sandbox| {
            let step = remaining.min(GUN_TURN_RATE);
            remaining -= step;
            let gun = &mut sandbox.agent.gun_heading;
            *gun = normalize_degrees(*gun + direction * step);
            remaining <= 0.0
        })
    }

    fn agent_fire(&mut self, power: f64) {
        let power = clamp_power(power);
        if !self.agent.can_fire(power) {
            return;
        }
        self.agent.discharge(power);

        let origin = self.agent.position();
        let heading = self.agent.gun_heading;
        let target = self
            .opponents
            .iter_mut()
            .filter(|body| body.alive())
            .filter_map(|body| ray_hit(origin, heading, body.position()).map(|d| (d, body)))
            .min_by(|a, b| a.0.total_cmp(&b.0));

        if let Some((_, body)) = target {
            body.energy = (body.energy - bullet_damage(power)).max(0.0);
            self.agent.energy += hit_bonus(power);
            self.events.push(CombatEvent::BulletHit { power });
        }
    }

    fn opponent_act(&mut self, index: usize) {
        let arena = self.config.arena();
        let target = self.agent.position();
        let power = self.config.opponent_power;
        let aim_error = self.config.opponent_aim_error;
        let rng = &mut self.rng;
        let body = &mut self.opponents[index];

        if body.plan.turn == 0.0 && body.plan.distance == 0.0 {
            body.plan = MovePlan {
                turn: rng.random_range(-90.0..=90.0),
                distance: rng.random_range(-200.0..=200.0),
            };
        }
        if body.plan.turn != 0.0 {
            let step = body.plan.turn.clamp(-BODY_TURN_RATE, BODY_TURN_RATE);
            body.plan.turn -= step;
            body.turn(step, false);
        } else {
            let step = body.plan.distance.clamp(-MAX_SPEED, MAX_SPEED);
            body.plan.distance -= step;
            if !body.advance(step, arena) {
                body.plan.distance = 0.0;
            }
        }

        let error = relative_degrees(absolute_bearing(body.position(), target) - body.gun_heading);
        let step = error.clamp(-GUN_TURN_RATE, GUN_TURN_RATE);
        body.gun_heading = normalize_degrees(body.gun_heading + step);

        if (error - step).abs() < f64::EPSILON && body.can_fire(power) {
            body.discharge(power);
            let deviation = if aim_error > 0.0 {
                rng.random_range(-aim_error..=aim_error)
            } else {
                0.0
            };
            let heading = normalize_degrees(body.gun_heading + deviation);
            if ray_hit(body.position(), heading, target).is_some() {
                body.energy += hit_bonus(power);
                self.agent.energy = (self.agent.energy - bullet_damage(power)).max(0.0);
                self.events.push(CombatEvent::HitByBullet { power });
            }
        }
    }

    fn scan(&mut self) {
        let origin = self.agent.position();
        let heading = self.agent.heading;
        let scans = self.opponents.iter().filter(|body| body.alive()).map(|body| {
            let (dx, dy) = (body.x - origin.0, body.y - origin.1);
            CombatEvent::ScannedRobot(OpponentScan {
                id: body.id,
                distance: dx.hypot(dy),
                bearing: normalize_degrees(absolute_bearing(origin, body.position()) - heading),
                heading: body.heading,
                energy: body.energy,
            })
        });
        self.events.extend(scans);
    }

    fn tick(&mut self) {
        self.round_tick += 1;
        self.total_ticks += 1;

        for body in std::iter::once(&mut self.agent).chain(self.opponents.iter_mut()) {
            body.gun_heat = (body.gun_heat - GUN_COOLING_RATE).max(0.0);
        }

        if self.config.opponent_style == OpponentStyle::Wanderer {
            for index in 0..self.opponents.len() {
                if self.opponents[index].alive() {
                    self.opponent_act(index);
                }
            }
        }

        self.scan();

        if !self.agent.alive() {
            self.end_round(Some(CombatEvent::Death));
        } else if self.opponents_alive() == 0 {
            self.end_round(Some(CombatEvent::Win));
        } else if self.round_tick >= self.config.tick_limit {
            self.end_round(None);
        }
    }
}

impl Simulator for SandboxArena {
    fn arena(&self) -> ArenaSize {
        self.config.arena()
    }

    fn telemetry(&self) -> Telemetry {
        Telemetry {
            x: self.agent.x,
            y: self.agent.y,
            energy: self.agent.energy,
            heading: self.agent.heading,
            gun_heading: self.agent.gun_heading,
        }
    }

    fn configure_radar(&mut self) -> Result<()> {
        self.gun_follows_body = false;
        Ok(())
    }

    fn ahead(&mut self, distance: f64) -> Result<()> {
        self.drive("ahead", distance)
    }

    fn back(&mut self, distance: f64) -> Result<()> {
        self.drive("back", -distance)
    }

    fn turn_left(&mut self, degrees: f64) -> Result<()> {
        self.rotate_body("turn_left", -degrees)
    }

    fn turn_right(&mut self, degrees: f64) -> Result<()> {
        self.rotate_body("turn_right", degrees)
    }

    fn turn_gun_left(&mut self, degrees: f64) -> Result<()> {
        self.rotate_gun("turn_gun_left", -degrees)
    }

    fn turn_gun_right(&mut self, degrees: f64) -> Result<()> {
        self.rotate_gun("turn_gun_right", degrees)
    }

    fn fire(&mut self, power: f64) -> Result<()> {
        self.execute("fire", |sandbox| {
            sandbox.agent_fire(power);
            true
        })
    }

    fn drain_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn duck_arena(rounds: u32) -> SandboxArena {
        let config = SandboxConfig::default()
            .with_rounds(rounds)
            .with_opponent_style(OpponentStyle::SittingDuck)
            .with_seed(Some(11));
        SandboxArena::new(config).unwrap()
    }

    fn last_scan(events: &[CombatEvent]) -> Option<OpponentScan> {
        events.iter().rev().find_map(|event| match event {
            CombatEvent::ScannedRobot(scan) => Some(*scan),
            _ => None,
        })
    }

    #[test]
    fn test_bullet_formulas() {
        assert_eq!(bullet_damage(1.0), 4.0);
        assert_eq!(bullet_damage(3.0), 16.0);
        assert!((gun_heat(3.0) - 1.6).abs() < 1e-12);
        assert_eq!(hit_bonus(2.0), 6.0);
        assert_eq!(clamp_power(100.0), MAX_POWER);
        assert_eq!(clamp_power(0.0), MIN_POWER);
        assert_eq!(clamp_power(f64::NAN), MIN_POWER);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(SandboxArena::new(SandboxConfig::default().with_rounds(0)).is_err());
        assert!(SandboxArena::new(SandboxConfig::default().with_opponents(0)).is_err());
        let tiny = SandboxConfig {
            width: 10.0,
            ..SandboxConfig::default()
        };
        assert!(matches!(
            SandboxArena::new(tiny),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_ahead_moves_along_heading() {
        let mut arena = duck_arena(1);
        arena.place_agent(400.0, 100.0, 0.0);
        arena.ahead(80.0).unwrap();
        let telemetry = arena.telemetry();
        assert!((telemetry.x - 400.0).abs() < 1e-9);
        assert!((telemetry.y - 180.0).abs() < 1e-9);
        assert_eq!(arena.total_ticks(), 10);
    }

    #[test]
    fn test_back_stops_at_wall() {
        let mut arena = duck_arena(1);
        arena.place_agent(400.0, 50.0, 0.0);
        arena.back(400.0).unwrap();
        assert_eq!(arena.telemetry().y, ROBOT_HALF_WIDTH);
        assert!(arena.total_ticks() < 50);
    }

    #[test]
    fn test_gun_follows_body_until_radar_configured() {
        let mut arena = duck_arena(1);
        arena.place_agent(400.0, 300.0, 0.0);
        arena.turn_right(45.0).unwrap();
        assert!((arena.telemetry().gun_heading - 45.0).abs() < 1e-9);

        arena.configure_radar().unwrap();
        arena.turn_left(90.0).unwrap();
        let telemetry = arena.telemetry();
        assert!((telemetry.heading - 315.0).abs() < 1e-9);
        assert!((telemetry.gun_heading - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_every_opponent_scanned_each_tick() {
        let config = SandboxConfig::default()
            .with_opponents(3)
            .with_opponent_style(OpponentStyle::SittingDuck)
            .with_seed(Some(5));
        let mut arena = SandboxArena::new(config).unwrap();
        arena.turn_gun_right(40.0).unwrap();
        let scans = arena
            .drain_events()
            .into_iter()
            .filter(|event| matches!(event, CombatEvent::ScannedRobot(_)))
            .count();
        assert_eq!(scans, 2 * 3);
    }

    #[test]
    fn test_scan_geometry() {
        let mut arena = duck_arena(1);
        arena.place_agent(400.0, 300.0, 90.0);
        arena.fire(0.1).unwrap();
        let scan = last_scan(&arena.drain_events()).unwrap();

        let duck = &arena.opponents[0];
        let (dx, dy) = (duck.x - 400.0, duck.y - 300.0);
        assert!((scan.distance - dx.hypot(dy)).abs() < 1e-9);
        let absolute = normalize_degrees(90.0 + scan.bearing);
        let (sin, cos) = absolute.to_radians().sin_cos();
        assert!((400.0 + scan.distance * sin - duck.x).abs() < 1e-6);
        assert!((300.0 + scan.distance * cos - duck.y).abs() < 1e-6);
    }

    #[test]
    fn test_aimed_fire_destroys_sitting_duck() {
        let mut arena = duck_arena(1);
        arena.configure_radar().unwrap();
        arena.fire(0.1).unwrap();

        let scan = last_scan(&arena.drain_events()).unwrap();
        let telemetry = arena.telemetry();
        let aim = normalize_degrees(telemetry.heading + scan.bearing - telemetry.gun_heading);
        arena.turn_gun_right(aim).unwrap();

        let mut hits = 0;
        let mut events = Vec::new();
        for _ in 0..500 {
            if arena.is_over() {
                break;
            }
            arena.fire(3.0).unwrap();
            for event in arena.drain_events() {
                if let CombatEvent::BulletHit { power } = event {
                    assert_eq!(power, MAX_POWER);
                    hits += 1;
                }
                events.push(event);
            }
        }

        assert_eq!(hits, 7);
        assert!(events.contains(&CombatEvent::Win));
        assert_eq!(events.last(), Some(&CombatEvent::BattleEnded));
        assert!(matches!(arena.fire(1.0), Err(Error::BattleOver { .. })));
    }

    #[test]
    fn test_tick_limit_ends_rounds_undecided() {
        let config = SandboxConfig::default()
            .with_rounds(2)
            .with_tick_limit(5)
            .with_seed(Some(3));
        let mut arena = SandboxArena::new(config).unwrap();

        arena.turn_gun_right(360.0).unwrap();
        assert_eq!(arena.rounds_completed(), 1);
        assert_eq!(arena.round(), 2);

        arena.turn_gun_right(360.0).unwrap();
        let events = arena.drain_events();
        assert!(arena.is_over());
        assert!(!events.contains(&CombatEvent::Win));
        assert!(!events.contains(&CombatEvent::Death));
        assert_eq!(events.last(), Some(&CombatEvent::BattleEnded));
    }

    #[test]
    fn test_wanderers_eventually_kill_idle_robot() {
        let config = SandboxConfig {
            opponent_aim_error: 0.0,
            ..SandboxConfig::default().with_rounds(1).with_seed(Some(9))
        };
        let mut arena = SandboxArena::new(config).unwrap();
        let mut events = Vec::new();
        while !arena.is_over() {
            arena.turn_gun_right(20.0).unwrap();
            events.extend(arena.drain_events());
        }
        assert!(events.iter().any(|e| matches!(e, CombatEvent::HitByBullet { .. })));
        assert!(events.contains(&CombatEvent::Death));
    }

    #[test]
    fn test_same_seed_same_battle() {
        let run = || {
            let mut arena = SandboxArena::new(SandboxConfig::default().with_seed(Some(21))).unwrap();
            for _ in 0..20 {
                arena.ahead(50.0).unwrap();
                arena.turn_right(30.0).unwrap();
            }
            (arena.telemetry(), arena.drain_events())
        };
        assert_eq!(run(), run());
    }
}
