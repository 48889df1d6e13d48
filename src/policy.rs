//! ε-greedy action selection over the action-value table

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    action::{Action, ActionCatalog},
    observation::Observation,
    sarsa::ActionValueTable,
};

pub(crate) fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Why the policy picked the action it returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Choice {
    /// Exploration draw below ε
    Explore,
    /// Best positive-valued action for the observation
    Greedy,
    /// No positive value recorded, so a random action
    Fallback,
}

/// ε-greedy policy with uniform-random fallback.
///
/// With probability ε the action is drawn from the catalog. Otherwise the
/// highest-valued action recorded for the observation is returned, provided
/// its value is strictly positive; ties go to the action recorded first.
/// Observations with no positive entry fall back to a random action.
#[derive(Debug, Clone)]
pub struct EpsilonGreedy {
    epsilon: f64,
    catalog: ActionCatalog,
    rng: StdRng,
}

impl EpsilonGreedy {
    pub fn new(epsilon: f64, catalog: ActionCatalog) -> Self {
        Self {
            epsilon,
            catalog,
            rng: build_rng(None),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon;
    }

    pub fn catalog(&self) -> &ActionCatalog {
        &self.catalog
    }

    /// Pick an action for `observation`.
    pub fn select(&mut self, table: &ActionValueTable, observation: &Observation) -> Action {
        self.choose(table, observation).0
    }

    /// Pick an action and report how it was chosen.
    pub fn choose(
        &mut self,
        table: &ActionValueTable,
        observation: &Observation,
    ) -> (Action, Choice) {
        if self.rng.random::<f64>() < self.epsilon {
            return (self.catalog.random_action(&mut self.rng), Choice::Explore);
        }

        match table
            .actions(observation)
            .and_then(|values| values.best_positive())
        {
            Some((action, _)) => (action, Choice::Greedy),
            None => (self.catalog.random_action(&mut self.rng), Choice::Fallback),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Telemetry;

    fn obs() -> Observation {
        Observation::observe(
            &Telemetry {
                x: 50.0,
                y: 60.0,
                energy: 100.0,
                heading: 0.0,
                gun_heading: 0.0,
            },
            None,
        )
    }

    #[test]
    fn test_greedy_returns_single_positive_action() {
        let mut table = ActionValueTable::default();
        table.update(obs(), Action::TurnBodyRight(45.0), 0.3);
        let mut policy = EpsilonGreedy::new(0.0, ActionCatalog::default()).with_seed(1);
        for _ in 0..100 {
            assert_eq!(
                policy.choose(&table, &obs()),
                (Action::TurnBodyRight(45.0), Choice::Greedy)
            );
        }
    }

    #[test]
    fn test_unknown_observation_falls_back_to_catalog() {
        let table = ActionValueTable::default();
        let mut policy = EpsilonGreedy::new(0.0, ActionCatalog::default()).with_seed(2);
        for _ in 0..100 {
            let (action, choice) = policy.choose(&table, &obs());
            assert_eq!(choice, Choice::Fallback);
            assert!(policy.catalog().contains(&action));
        }
    }

    #[test]
    fn test_non_positive_values_fall_back() {
        let mut table = ActionValueTable::default();
        table.update(obs(), Action::Fire(1.0), 0.0);
        table.update(obs(), Action::Fire(2.0), -4.0);
        let mut policy = EpsilonGreedy::new(0.0, ActionCatalog::default()).with_seed(3);
        let (_, choice) = policy.choose(&table, &obs());
        assert_eq!(choice, Choice::Fallback);
    }

    #[test]
    fn test_epsilon_one_always_explores() {
        let mut table = ActionValueTable::default();
        table.update(obs(), Action::Fire(1.0), 50.0);
        let mut policy = EpsilonGreedy::new(1.0, ActionCatalog::default()).with_seed(4);
        for _ in 0..50 {
            assert_eq!(policy.choose(&table, &obs()).1, Choice::Explore);
        }
    }

    #[test]
    fn test_seeded_policies_agree() {
        let table = ActionValueTable::default();
        let mut a = EpsilonGreedy::new(0.1, ActionCatalog::default()).with_seed(42);
        let mut b = EpsilonGreedy::new(0.1, ActionCatalog::default()).with_seed(42);
        for _ in 0..20 {
            assert_eq!(a.select(&table, &obs()), b.select(&table, &obs()));
        }
    }
}
