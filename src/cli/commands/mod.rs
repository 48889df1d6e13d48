//! Subcommands of the `robosarsa` binary

pub mod compare;
pub mod inspect;
pub mod train;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::{app::AgentConfig, arena::SandboxConfig};

/// Arena options shared by commands that run battles
#[derive(Args, Debug, Clone)]
pub struct ArenaArgs {
    /// Rounds per battle
    #[arg(long, short = 'r', default_value_t = 10)]
    pub rounds: u32,

    /// Number of scripted opponents
    #[arg(long, default_value_t = 1)]
    pub opponents: u32,

    /// Ticks before a round ends undecided
    #[arg(long, default_value_t = 2000)]
    pub tick_limit: u32,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,
}

impl ArenaArgs {
    pub fn sandbox_config(&self) -> SandboxConfig {
        SandboxConfig::default()
            .with_rounds(self.rounds)
            .with_opponents(self.opponents)
            .with_tick_limit(self.tick_limit)
            .with_seed(self.seed)
    }
}

/// Agent options shared by commands that create the SARSA robot
#[derive(Args, Debug, Clone, Default)]
pub struct AgentArgs {
    /// JSON file with agent hyperparameters
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory holding the knowledge file
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Exploration rate, overriding the config file
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Select the bootstrap action for the next observation (textbook SARSA)
    #[arg(long)]
    pub canonical_sarsa: bool,
}

impl AgentArgs {
    /// Config file values with command-line overrides applied.
    pub fn agent_config(&self, seed: Option<u64>) -> Result<AgentConfig> {
        let mut config = match &self.config {
            Some(path) => AgentConfig::from_json_file(path)
                .with_context(|| format!("failed to load agent config {}", path.display()))?,
            None => AgentConfig::default(),
        };
        if let Some(data_dir) = &self.data_dir {
            config = config.with_data_dir(data_dir);
        }
        if let Some(epsilon) = self.epsilon {
            config = config.with_epsilon(epsilon);
        }
        if self.canonical_sarsa {
            config = config.with_bootstrap(crate::sarsa::Bootstrap::NextObservation);
        }
        if let Some(seed) = seed {
            config = config.with_seed(seed);
        }
        config.validate().context("invalid agent configuration")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sarsa::Bootstrap;

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent.json");
        std::fs::write(&path, r#"{"epsilon": 0.3, "buckets": 6}"#).unwrap();

        let args = AgentArgs {
            config: Some(path),
            data_dir: Some(dir.path().join("robot")),
            epsilon: Some(0.0),
            canonical_sarsa: true,
        };
        let config = args.agent_config(Some(4)).unwrap();
        assert_eq!(config.epsilon, 0.0);
        assert_eq!(config.buckets, 6);
        assert_eq!(config.bootstrap, Bootstrap::NextObservation);
        assert_eq!(config.seed, Some(4));
        assert_eq!(config.knowledge_path(), dir.path().join("robot").join("q.msgpack"));
    }

    #[test]
    fn test_invalid_override_is_reported() {
        let args = AgentArgs {
            epsilon: Some(3.0),
            ..AgentArgs::default()
        };
        assert!(args.agent_config(None).is_err());
    }
}
