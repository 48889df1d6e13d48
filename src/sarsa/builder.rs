//! Builder pattern for SarsaAgent construction
//!
//! Provides a fluent API for configuring and creating SARSA agents.

use crate::{
    action::{ActionCatalog, CatalogBounds},
    policy::EpsilonGreedy,
    reward::{RewardAccumulator, RewardSchedule},
    sarsa::{
        agent::{Bootstrap, SarsaAgent},
        knowledge::{Knowledge, KnowledgeStore},
        table::TdParams,
    },
};

/// Builder for constructing SarsaAgent instances with custom configuration.
///
/// # Examples
///
/// ```
/// use robosarsa::sarsa::{Bootstrap, SarsaAgentBuilder};
///
/// // Defaults: α = γ = ε = 0.1, empty table, no persistence
/// let agent = SarsaAgentBuilder::new().build();
///
/// // Deterministic, greedy, canonical SARSA
/// let agent = SarsaAgentBuilder::new()
///     .seed(42)
///     .epsilon(0.0)
///     .bootstrap(Bootstrap::NextObservation)
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct SarsaAgentBuilder {
    seed: Option<u64>,
    params: TdParams,
    epsilon: Option<f64>,
    bounds: CatalogBounds,
    rewards: RewardSchedule,
    bootstrap: Bootstrap,
    knowledge: Option<Knowledge>,
    store: Option<KnowledgeStore>,
}

impl SarsaAgentBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the random seed for deterministic behavior.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set learning rate and discount factor.
    pub fn params(mut self, params: TdParams) -> Self {
        self.params = params;
        self
    }

    /// Set the exploration rate.
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = Some(epsilon);
        self
    }

    /// Set the parameter bounds for random actions.
    pub fn catalog(mut self, bounds: CatalogBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Set the win/death rewards.
    pub fn rewards(mut self, rewards: RewardSchedule) -> Self {
        self.rewards = rewards;
        self
    }

    /// Choose which observation the bootstrap action is selected for.
    pub fn bootstrap(mut self, bootstrap: Bootstrap) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    /// Start from previously learned knowledge instead of an empty table.
    pub fn knowledge(mut self, knowledge: Knowledge) -> Self {
        self.knowledge = Some(knowledge);
        self
    }

    /// Persist the table to `store` whenever a battle ends.
    pub fn store(mut self, store: KnowledgeStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the agent.
    pub fn build(self) -> SarsaAgent {
        let mut policy = EpsilonGreedy::new(
            self.epsilon.unwrap_or(0.1),
            ActionCatalog::new(self.bounds),
        );
        if let Some(seed) = self.seed {
            policy = policy.with_seed(seed);
        }
        let knowledge = self.knowledge.unwrap_or_else(|| Knowledge::empty(Default::default()));

        SarsaAgent::from_parts(
            knowledge,
            self.params,
            self.bootstrap,
            policy,
            RewardAccumulator::new(self.rewards),
            self.store,
        )
    }
}
