//! Configuration types for agent creation.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    action::CatalogBounds,
    observation::DEFAULT_BUCKETS,
    reward::RewardSchedule,
    sarsa::{Bootstrap, TdParams},
};

/// Configuration for creating a SARSA agent.
///
/// This type provides a type-safe, builder-style API for configuring agents
/// before creation through the dependency injection container. It can also be
/// read from a JSON file; missing fields take their defaults.
///
/// # Examples
///
/// ```
/// use robosarsa::app::AgentConfig;
/// use robosarsa::sarsa::Bootstrap;
///
/// let config = AgentConfig::new()
///     .with_seed(42)
///     .with_epsilon(0.05)
///     .with_bootstrap(Bootstrap::NextObservation)
///     .with_data_dir("robots/sarsa");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Step size α
    pub learning_rate: f64,
    /// Discount γ
    pub discount_factor: f64,
    /// Exploration rate ε
    pub epsilon: f64,
    /// Buckets per observation dimension
    pub buckets: u16,
    pub bootstrap: Bootstrap,
    pub rewards: RewardSchedule,
    pub catalog: CatalogBounds,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
    /// The robot's private data directory
    pub data_dir: PathBuf,
    pub knowledge_file: PathBuf,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.1,
            epsilon: 0.1,
            buckets: DEFAULT_BUCKETS,
            bootstrap: Bootstrap::default(),
            rewards: RewardSchedule::default(),
            catalog: CatalogBounds::default(),
            seed: None,
            data_dir: PathBuf::from("data"),
            knowledge_file: PathBuf::from("q.msgpack"),
        }
    }
}

impl AgentConfig {
    /// Create a configuration with the default hyperparameters
    /// (α = γ = ε = 0.1, 10 buckets, win +200, death -200).
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read config file {path:?}"),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_buckets(mut self, buckets: u16) -> Self {
        self.buckets = buckets;
        self
    }

    pub fn with_bootstrap(mut self, bootstrap: Bootstrap) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    pub fn with_rewards(mut self, rewards: RewardSchedule) -> Self {
        self.rewards = rewards;
        self
    }

    pub fn with_catalog(mut self, catalog: CatalogBounds) -> Self {
        self.catalog = catalog;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_knowledge_file(mut self, knowledge_file: impl Into<PathBuf>) -> Self {
        self.knowledge_file = knowledge_file.into();
        self
    }

    /// Where the learned table is kept.
    pub fn knowledge_path(&self) -> PathBuf {
        self.data_dir.join(&self.knowledge_file)
    }

    pub fn td_params(&self) -> TdParams {
        TdParams {
            learning_rate: self.learning_rate,
            discount_factor: self.discount_factor,
        }
    }

    /// Check hyperparameters and bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        let unit = [
            ("learning_rate", self.learning_rate),
            ("discount_factor", self.discount_factor),
            ("epsilon", self.epsilon),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfiguration {
                    message: format!("{name} must be in [0, 1], got {value}"),
                });
            }
        }
        if self.buckets == 0 {
            return Err(Error::InvalidConfiguration {
                message: "buckets must be at least 1".to_string(),
            });
        }
        let bounds = [
            ("catalog.max_distance", self.catalog.max_distance),
            ("catalog.max_power", self.catalog.max_power),
            ("catalog.max_angle", f64::from(self.catalog.max_angle)),
        ];
        for (name, value) in bounds {
            if !(value > 0.0 && value.is_finite()) {
                return Err(Error::InvalidConfiguration {
                    message: format!("{name} must be positive, got {value}"),
                });
            }
        }
        if !(self.rewards.win.is_finite() && self.rewards.death.is_finite()) {
            return Err(Error::InvalidConfiguration {
                message: "rewards must be finite".to_string(),
            });
        }
        Ok(())
    }
}
