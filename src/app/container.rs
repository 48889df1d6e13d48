//! Dependency injection container for the robot application.
//!
//! This module provides centralized dependency management following hexagonal
//! architecture principles. The container owns infrastructure dependencies and
//! provides factory methods for creating domain objects.

use std::sync::Arc;

use super::config::AgentConfig;
use crate::{
    Result,
    adapters::MsgPackRepository,
    arena::ArenaSize,
    baseline::SimpleRobot,
    observation::Discretizer,
    ports::TableRepository,
    sarsa::{Knowledge, KnowledgeStore, SarsaAgent, SarsaAgentBuilder},
};

/// Application with dependency injection.
///
/// Centralizes creation and wiring of dependencies. The knowledge file is
/// read once, when the agent is created; the agent then owns the table for
/// the rest of the process and writes it back after every battle.
///
/// # Examples
///
/// ## Production usage
///
/// ```no_run
/// use robosarsa::app::{App, AgentConfig};
/// use robosarsa::arena::ArenaSize;
///
/// let app = App::new();
/// let config = AgentConfig::new().with_seed(42);
/// let agent = app.create_agent(&config, ArenaSize::default())?;
/// # Ok::<(), robosarsa::Error>(())
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use robosarsa::app::App;
/// use robosarsa::adapters::InMemoryRepository;
///
/// let app = App::for_testing()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
pub struct App {
    /// Repository for table persistence
    table_repository: Arc<dyn TableRepository + Send + Sync>,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create a new app with production defaults.
    ///
    /// Uses:
    /// - `MsgPackRepository` for table persistence
    /// - No default seed (non-deterministic RNG)
    pub fn new() -> Self {
        Self {
            table_repository: Arc::new(MsgPackRepository::new()),
            default_seed: None,
        }
    }

    /// Create a builder for constructing app with custom dependencies.
    ///
    /// Primarily used for testing with in-memory dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    /// Get the table repository.
    pub fn table_repository(&self) -> Arc<dyn TableRepository + Send + Sync> {
        Arc::clone(&self.table_repository)
    }

    /// Seed from `config`, falling back to the container default.
    pub fn seed_for(&self, config: &AgentConfig) -> Option<u64> {
        config.seed.or(self.default_seed)
    }

    /// The store bound to the configured knowledge file.
    pub fn knowledge_store(&self, config: &AgentConfig) -> KnowledgeStore {
        KnowledgeStore::new(self.table_repository(), config.knowledge_path())
    }

    /// Read the knowledge file, or start empty if it is missing or unreadable.
    pub fn load_knowledge(&self, config: &AgentConfig, arena: ArenaSize) -> Knowledge {
        self.knowledge_store(config)
            .load_or_empty(Discretizer::new(arena, config.buckets))
    }

    /// Create a SARSA agent, loading any previously learned table.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation. A missing or corrupt
    /// knowledge file is not an error.
    pub fn create_agent(&self, config: &AgentConfig, arena: ArenaSize) -> Result<SarsaAgent> {
        config.validate()?;
        let knowledge = self.load_knowledge(config, arena);
        self.create_agent_with(config, knowledge)
    }

    /// Create a SARSA agent from already loaded knowledge.
    pub fn create_agent_with(&self, config: &AgentConfig, knowledge: Knowledge) -> Result<SarsaAgent> {
        config.validate()?;
        Ok(self
            .agent_builder(config, knowledge)
            .store(self.knowledge_store(config))
            .build())
    }

    /// Create a SARSA agent that starts from the saved table but never
    /// writes it back.
    pub fn create_detached_agent(&self, config: &AgentConfig, arena: ArenaSize) -> Result<SarsaAgent> {
        config.validate()?;
        let knowledge = self.load_knowledge(config, arena);
        Ok(self.agent_builder(config, knowledge).build())
    }

    fn agent_builder(&self, config: &AgentConfig, knowledge: Knowledge) -> SarsaAgentBuilder {
        let builder = SarsaAgent::builder()
            .params(config.td_params())
            .epsilon(config.epsilon)
            .catalog(config.catalog)
            .rewards(config.rewards)
            .bootstrap(config.bootstrap)
            .knowledge(knowledge);

        // Apply seed from config or use container default
        match self.seed_for(config) {
            Some(seed) => builder.seed(seed),
            None => builder,
        }
    }

    /// Create the non-learning baseline robot.
    pub fn create_baseline(&self, seed: Option<u64>) -> SimpleRobot {
        SimpleRobot::new(seed.or(self.default_seed))
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing app with custom dependencies.
///
/// Primarily used for testing to inject in-memory repositories and control
/// randomness.
///
/// # Examples
///
/// ```
/// use robosarsa::app::AppBuilder;
/// use robosarsa::adapters::InMemoryRepository;
///
/// let app = AppBuilder::new()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
#[derive(Default)]
pub struct AppBuilder {
    table_repository: Option<Arc<dyn TableRepository + Send + Sync>>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    /// Create a new app builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom table repository.
    pub fn with_repository<R: TableRepository + Send + Sync + 'static>(mut self, repo: R) -> Self {
        self.table_repository = Some(Arc::new(repo));
        self
    }

    /// Set a default random seed for everything created by this container.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app with the configured dependencies.
    ///
    /// If no repository was specified, uses `MsgPackRepository` by default.
    pub fn build(self) -> App {
        App {
            table_repository: self
                .table_repository
                .unwrap_or_else(|| Arc::new(MsgPackRepository::new())),
            default_seed: self.default_seed,
        }
    }
}
