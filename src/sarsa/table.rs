//! Action-value table for temporal difference learning

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    action::Action,
    observation::{BucketKey, Discretizer, Observation},
};

/// Step size and discount used by the TD update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TdParams {
    /// Learning rate α
    pub learning_rate: f64,
    /// Discount factor γ
    pub discount_factor: f64,
}

impl Default for TdParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.1,
        }
    }
}

/// Values recorded for the actions tried in one observation, in the order
/// the actions were first seen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionValues {
    entries: Vec<(Action, f64)>,
}

impl ActionValues {
    pub fn get(&self, action: &Action) -> Option<f64> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == action)
            .map(|(_, value)| *value)
    }

    pub fn set(&mut self, action: Action, value: f64) {
        match self.entries.iter_mut().find(|(candidate, _)| *candidate == action) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((action, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Action, f64)> {
        self.entries.iter().map(|(action, value)| (action, *value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest-valued action among those strictly above zero.
    ///
    /// Ties go to the action seen first.
    pub fn best_positive(&self) -> Option<(Action, f64)> {
        let mut best: Option<(Action, f64)> = None;
        for &(action, value) in &self.entries {
            let threshold = best.map_or(0.0, |(_, top)| top);
            if value > threshold {
                best = Some((action, value));
            }
        }
        best
    }
}

#[derive(Debug, Clone)]
struct ObservationSlot {
    observation: Observation,
    values: ActionValues,
}

/// Summary numbers for a table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableStats {
    pub observations: usize,
    pub state_actions: usize,
    pub buckets: usize,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub mean_value: Option<f64>,
}

/// Action-value table mapping (observation, action) pairs to value estimates.
///
/// Observations are grouped under their [`BucketKey`]; within a bucket the
/// matching observation is found by exact comparison. Entries are created on
/// first update and never removed. Unseen pairs read as `0.0`.
#[derive(Debug, Clone)]
pub struct ActionValueTable {
    discretizer: Discretizer,
    index: HashMap<BucketKey, Vec<ObservationSlot>>,
    observations: usize,
}

impl ActionValueTable {
    /// Create an empty table
    pub fn new(discretizer: Discretizer) -> Self {
        Self {
            discretizer,
            index: HashMap::new(),
            observations: 0,
        }
    }

    pub fn discretizer(&self) -> &Discretizer {
        &self.discretizer
    }

    fn slot(&self, observation: &Observation) -> Option<&ObservationSlot> {
        let key = self.discretizer.key(observation);
        self.index
            .get(&key)?
            .iter()
            .find(|slot| slot.observation == *observation)
    }

    fn slot_mut(&mut self, observation: Observation) -> &mut ActionValues {
        let key = self.discretizer.key(&observation);
        let slots = self.index.entry(key).or_default();
        let position = match slots.iter().position(|slot| slot.observation == observation) {
            Some(position) => position,
            None => {
                slots.push(ObservationSlot {
                    observation,
                    values: ActionValues::default(),
                });
                self.observations += 1;
                slots.len() - 1
            }
        };
        &mut slots[position].values
    }

    /// Recorded values for an observation, if it was ever updated.
    pub fn actions(&self, observation: &Observation) -> Option<&ActionValues> {
        self.slot(observation).map(|slot| &slot.values)
    }

    /// Get the value for a state-action pair (0.0 if unseen)
    pub fn value(&self, observation: &Observation, action: &Action) -> f64 {
        self.actions(observation)
            .and_then(|values| values.get(action))
            .unwrap_or(0.0)
    }

    /// Insert or overwrite the value for a state-action pair
    pub fn update(&mut self, observation: Observation, action: Action, value: f64) {
        self.slot_mut(observation).set(action, value);
    }

    /// Merge a whole set of action values into an observation's slot.
    pub(crate) fn insert_values(&mut self, observation: Observation, values: ActionValues) {
        let slot = self.slot_mut(observation);
        for (action, value) in values.iter() {
            slot.set(*action, value);
        }
    }

    /// SARSA update: on-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ Q(s',a') - Q(s,a)]
    ///
    /// Returns the new Q(s,a).
    pub fn sarsa_update(
        &mut self,
        params: &TdParams,
        observation: Observation,
        action: Action,
        reward: f64,
        next_observation: &Observation,
        next_action: &Action,
    ) -> f64 {
        let current_q = self.value(&observation, &action);
        let next_q = self.value(next_observation, next_action);
        let td_target = reward + params.discount_factor * next_q;
        let td_error = td_target - current_q;
        let new_q = current_q + params.learning_rate * td_error;
        self.update(observation, action, new_q);
        new_q
    }

    /// Re-index every entry under a different discretizer, e.g. after moving
    /// to an arena of another size.
    pub fn rebucket(&mut self, discretizer: Discretizer) {
        if discretizer == self.discretizer {
            return;
        }
        let old = std::mem::take(&mut self.index);
        self.discretizer = discretizer;
        self.observations = 0;
        for slot in old.into_values().flatten() {
            self.insert_values(slot.observation, slot.values);
        }
    }

    /// Every stored observation with its action values.
    pub fn iter(&self) -> impl Iterator<Item = (&Observation, &ActionValues)> {
        self.index
            .values()
            .flatten()
            .map(|slot| (&slot.observation, &slot.values))
    }

    /// Number of distinct observations stored
    pub fn len(&self) -> usize {
        self.observations
    }

    pub fn is_empty(&self) -> bool {
        self.observations == 0
    }

    /// Number of occupied buckets
    pub fn bucket_count(&self) -> usize {
        self.index.len()
    }

    /// Total number of state-action values stored
    pub fn state_action_count(&self) -> usize {
        self.iter().map(|(_, values)| values.len()).sum()
    }

    pub fn stats(&self) -> TableStats {
        let mut stats = TableStats {
            observations: self.len(),
            buckets: self.bucket_count(),
            ..TableStats::default()
        };
        let mut sum = 0.0;
        for (_, values) in self.iter() {
            for (_, value) in values.iter() {
                stats.state_actions += 1;
                sum += value;
                stats.min_value = Some(stats.min_value.map_or(value, |min| min.min(value)));
                stats.max_value = Some(stats.max_value.map_or(value, |max| max.max(value)));
            }
        }
        if stats.state_actions > 0 {
            stats.mean_value = Some(sum / stats.state_actions as f64);
        }
        stats
    }

    /// The `n` highest-valued state-action pairs, best first.
    pub fn top_entries(&self, n: usize) -> Vec<(Observation, Action, f64)> {
        let mut all: Vec<(Observation, Action, f64)> = self
            .iter()
            .flat_map(|(observation, values)| {
                values
                    .iter()
                    .map(move |(action, value)| (*observation, *action, value))
            })
            .collect();
        all.sort_by(|a, b| b.2.total_cmp(&a.2));
        all.truncate(n);
        all
    }
}

impl Default for ActionValueTable {
    fn default() -> Self {
        Self::new(Discretizer::default())
    }
}

impl PartialEq for ActionValueTable {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(observation, values)| other.actions(observation) == Some(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::{ArenaSize, Telemetry};

    fn obs(x: f64) -> Observation {
        Observation::observe(
            &Telemetry {
                x,
                y: 100.0,
                energy: 90.0,
                heading: 10.0,
                gun_heading: 20.0,
            },
            None,
        )
    }

    #[test]
    fn test_table_defaults_to_zero() {
        let table = ActionValueTable::default();
        assert_eq!(table.value(&obs(1.0), &Action::Fire(1.0)), 0.0);
        assert!(table.actions(&obs(1.0)).is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn test_update_and_value() {
        let mut table = ActionValueTable::default();
        table.update(obs(1.0), Action::Fire(1.0), 1.5);
        assert_eq!(table.value(&obs(1.0), &Action::Fire(1.0)), 1.5);
        table.update(obs(1.0), Action::Fire(1.0), -0.5);
        assert_eq!(table.value(&obs(1.0), &Action::Fire(1.0)), -0.5);
        assert_eq!(table.len(), 1);
        assert_eq!(table.state_action_count(), 1);
    }

    #[test]
    fn test_colliding_observations_stay_separate() {
        let mut table = ActionValueTable::default();
        let a = obs(10.0);
        let b = obs(11.0);
        assert_eq!(table.discretizer().key(&a), table.discretizer().key(&b));

        table.update(a, Action::Fire(1.0), 3.0);
        table.update(b, Action::Fire(1.0), -7.0);

        assert_eq!(table.value(&a, &Action::Fire(1.0)), 3.0);
        assert_eq!(table.value(&b, &Action::Fire(1.0)), -7.0);
        assert_eq!(table.len(), 2);
        assert_eq!(table.bucket_count(), 1);
        assert_eq!(table.value(&obs(12.0), &Action::Fire(1.0)), 0.0);
    }

    #[test]
    fn test_sarsa_update() {
        let params = TdParams::default();
        let mut table = ActionValueTable::default();
        let state = obs(1.0);
        let next_state = obs(500.0);
        let a1 = Action::MoveForward(20.0);
        let a2 = Action::Fire(3.0);

        table.update(next_state, a2, 2.0);
        let updated = table.sarsa_update(&params, state, a1, 5.0, &next_state, &a2);

        // Q(s,a1) = 0 + 0.1 * (5 + 0.1 * 2 - 0) = 0.52
        assert!((updated - 0.52).abs() < 1e-12);
        assert!((table.value(&state, &a1) - 0.52).abs() < 1e-12);
    }

    #[test]
    fn test_best_positive_prefers_first_of_ties() {
        let mut values = ActionValues::default();
        values.set(Action::Fire(1.0), 0.0);
        assert_eq!(values.best_positive(), None);

        values.set(Action::Fire(2.0), 4.0);
        values.set(Action::MoveForward(3.0), 4.0);
        values.set(Action::TurnBodyLeft(90.0), -9.0);
        assert_eq!(values.best_positive(), Some((Action::Fire(2.0), 4.0)));

        values.set(Action::MoveForward(3.0), 4.5);
        assert_eq!(values.best_positive(), Some((Action::MoveForward(3.0), 4.5)));
    }

    #[test]
    fn test_rebucket_keeps_entries() {
        let mut table = ActionValueTable::default();
        table.update(obs(10.0), Action::Fire(1.0), 1.0);
        table.update(obs(700.0), Action::Fire(2.0), 2.0);
        let before = table.clone();

        table.rebucket(Discretizer::new(ArenaSize::new(1200.0, 1200.0), 5));
        assert_eq!(table.len(), 2);
        assert_eq!(table.value(&obs(700.0), &Action::Fire(2.0)), 2.0);
        assert_eq!(table, before);
    }

    #[test]
    fn test_stats_and_top_entries() {
        let mut table = ActionValueTable::default();
        assert_eq!(table.stats().mean_value, None);

        table.update(obs(1.0), Action::Fire(1.0), 1.0);
        table.update(obs(1.0), Action::Fire(2.0), 3.0);
        table.update(obs(300.0), Action::Fire(1.0), -1.0);

        let stats = table.stats();
        assert_eq!(stats.observations, 2);
        assert_eq!(stats.state_actions, 3);
        assert_eq!(stats.min_value, Some(-1.0));
        assert_eq!(stats.max_value, Some(3.0));
        assert_eq!(stats.mean_value, Some(1.0));

        let top = table.top_entries(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].1, Action::Fire(2.0));
        assert_eq!(top[1].2, 1.0);
    }
}
