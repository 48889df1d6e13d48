//! Action catalog: the discrete command primitives a robot can learn to use

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Result, ports::Simulator, types::same_bits};

/// One command primitive together with its numeric parameter.
///
/// Equality and hashing use the variant and the exact bits of the parameter,
/// so `MoveForward(10.0)` and `MoveForward(10.000001)` are unrelated table
/// keys. Randomly drawn parameters therefore fragment the table; value
/// estimates rarely transfer between near-identical parameterisations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    MoveForward(f64),
    MoveBackward(f64),
    TurnBodyLeft(f64),
    TurnBodyRight(f64),
    TurnTurretLeft(f64),
    TurnTurretRight(f64),
    Fire(f64),
}

/// Parameter-free tag of an [`Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    MoveForward,
    MoveBackward,
    TurnBodyLeft,
    TurnBodyRight,
    TurnTurretLeft,
    TurnTurretRight,
    Fire,
}

impl ActionKind {
    pub const ALL: [ActionKind; 7] = [
        ActionKind::MoveForward,
        ActionKind::Fire,
        ActionKind::TurnTurretLeft,
        ActionKind::TurnTurretRight,
        ActionKind::TurnBodyLeft,
        ActionKind::TurnBodyRight,
        ActionKind::MoveBackward,
    ];

    pub fn with_parameter(self, value: f64) -> Action {
        match self {
            ActionKind::MoveForward => Action::MoveForward(value),
            ActionKind::MoveBackward => Action::MoveBackward(value),
            ActionKind::TurnBodyLeft => Action::TurnBodyLeft(value),
            ActionKind::TurnBodyRight => Action::TurnBodyRight(value),
            ActionKind::TurnTurretLeft => Action::TurnTurretLeft(value),
            ActionKind::TurnTurretRight => Action::TurnTurretRight(value),
            ActionKind::Fire => Action::Fire(value),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::MoveForward => "move_forward",
            ActionKind::MoveBackward => "move_backward",
            ActionKind::TurnBodyLeft => "turn_body_left",
            ActionKind::TurnBodyRight => "turn_body_right",
            ActionKind::TurnTurretLeft => "turn_turret_left",
            ActionKind::TurnTurretRight => "turn_turret_right",
            ActionKind::Fire => "fire",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::MoveForward(_) => ActionKind::MoveForward,
            Action::MoveBackward(_) => ActionKind::MoveBackward,
            Action::TurnBodyLeft(_) => ActionKind::TurnBodyLeft,
            Action::TurnBodyRight(_) => ActionKind::TurnBodyRight,
            Action::TurnTurretLeft(_) => ActionKind::TurnTurretLeft,
            Action::TurnTurretRight(_) => ActionKind::TurnTurretRight,
            Action::Fire(_) => ActionKind::Fire,
        }
    }

    /// Distance, angle or power, depending on the variant.
    pub fn parameter(&self) -> f64 {
        match *self {
            Action::MoveForward(v)
            | Action::MoveBackward(v)
            | Action::TurnBodyLeft(v)
            | Action::TurnBodyRight(v)
            | Action::TurnTurretLeft(v)
            | Action::TurnTurretRight(v)
            | Action::Fire(v) => v,
        }
    }
}

impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && same_bits(self.parameter(), other.parameter())
    }
}

impl Eq for Action {}

impl Hash for Action {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        self.parameter().to_bits().hash(state);
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:.2})", self.kind(), self.parameter())
    }
}

/// Issue `action` to the simulator. Blocks until the host has executed it.
pub fn apply<S: Simulator + ?Sized>(action: &Action, sim: &mut S) -> Result<()> {
    match *action {
        Action::MoveForward(distance) => sim.ahead(distance),
        Action::MoveBackward(distance) => sim.back(distance),
        Action::TurnBodyLeft(degrees) => sim.turn_left(degrees),
        Action::TurnBodyRight(degrees) => sim.turn_right(degrees),
        Action::TurnTurretLeft(degrees) => sim.turn_gun_left(degrees),
        Action::TurnTurretRight(degrees) => sim.turn_gun_right(degrees),
        Action::Fire(power) => sim.fire(power),
    }
}

/// Upper bounds for randomly drawn action parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CatalogBounds {
    pub max_distance: f64,
    /// Angles are drawn as whole degrees in `0..=max_angle`
    pub max_angle: u32,
    pub max_power: f64,
}

impl Default for CatalogBounds {
    fn default() -> Self {
        Self {
            max_distance: 400.0,
            max_angle: 360,
            max_power: 100.0,
        }
    }
}

/// Uniform sampler over the action catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionCatalog {
    bounds: CatalogBounds,
}

impl ActionCatalog {
    pub fn new(bounds: CatalogBounds) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> &CatalogBounds {
        &self.bounds
    }

    /// Pick a variant uniformly, then draw its parameter independently.
    pub fn random_action<R: Rng>(&self, rng: &mut R) -> Action {
        let kind = ActionKind::ALL[rng.random_range(0..ActionKind::ALL.len())];
        let value = match kind {
            ActionKind::MoveForward | ActionKind::MoveBackward => {
                rng.random::<f64>() * self.bounds.max_distance
            }
            ActionKind::Fire => rng.random::<f64>() * self.bounds.max_power,
            _ => f64::from(rng.random_range(0..=self.bounds.max_angle)),
        };
        kind.with_parameter(value)
    }

    /// Whether `action` could have been produced by this catalog.
    pub fn contains(&self, action: &Action) -> bool {
        let value = action.parameter();
        let max = match action.kind() {
            ActionKind::MoveForward | ActionKind::MoveBackward => self.bounds.max_distance,
            ActionKind::Fire => self.bounds.max_power,
            _ => f64::from(self.bounds.max_angle),
        };
        (0.0..=max).contains(&value)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::test_support::{Command, ScriptedSimulator};

    #[test]
    fn test_equality_is_by_kind_and_parameter() {
        assert_eq!(Action::Fire(3.0), Action::Fire(3.0));
        assert_ne!(Action::Fire(3.0), Action::Fire(3.5));
        assert_ne!(Action::TurnBodyLeft(90.0), Action::TurnBodyRight(90.0));

        let mut set = HashSet::new();
        set.insert(Action::MoveForward(10.0));
        set.insert(Action::MoveForward(10.0));
        set.insert(Action::MoveBackward(10.0));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_random_actions_stay_in_bounds() {
        let catalog = ActionCatalog::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut kinds = HashSet::new();
        for _ in 0..2_000 {
            let action = catalog.random_action(&mut rng);
            assert!(catalog.contains(&action), "{action} out of bounds");
            kinds.insert(action.kind());
        }
        assert_eq!(kinds.len(), ActionKind::ALL.len());
    }

    #[test]
    fn test_random_angles_are_whole_degrees() {
        let catalog = ActionCatalog::default();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..500 {
            let action = catalog.random_action(&mut rng);
            if matches!(
                action.kind(),
                ActionKind::TurnBodyLeft
                    | ActionKind::TurnBodyRight
                    | ActionKind::TurnTurretLeft
                    | ActionKind::TurnTurretRight
            ) {
                assert_eq!(action.parameter().fract(), 0.0);
            }
        }
    }

    #[test]
    fn test_apply_dispatches_to_matching_primitive() {
        let mut sim = ScriptedSimulator::default();
        apply(&Action::MoveForward(20.0), &mut sim).unwrap();
        apply(&Action::MoveBackward(5.0), &mut sim).unwrap();
        apply(&Action::TurnBodyLeft(10.0), &mut sim).unwrap();
        apply(&Action::TurnBodyRight(11.0), &mut sim).unwrap();
        apply(&Action::TurnTurretLeft(12.0), &mut sim).unwrap();
        apply(&Action::TurnTurretRight(13.0), &mut sim).unwrap();
        apply(&Action::Fire(2.0), &mut sim).unwrap();

        assert_eq!(
            sim.commands,
            vec![
                Command::Ahead(20.0),
                Command::Back(5.0),
                Command::TurnLeft(10.0),
                Command::TurnRight(11.0),
                Command::TurnGunLeft(12.0),
                Command::TurnGunRight(13.0),
                Command::Fire(2.0),
            ]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Action::Fire(2.5).to_string(), "fire(2.50)");
    }
}
