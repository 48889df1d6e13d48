//! robosarsa CLI - train, compare and inspect the SARSA combat robot
//!
//! This CLI provides a unified interface for:
//! - Training the robot in the sandbox arena
//! - Comparing it with the scripted baseline robot
//! - Inspecting the learned action-value table

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::filter::EnvFilter;

#[derive(Parser)]
#[command(name = "robosarsa")]
#[command(version, about = "SARSA-learning combat robot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the robot, updating its saved table after every battle
    Train(Box<robosarsa::cli::commands::train::TrainArgs>),

    /// Compare the trained robot with the baseline robot
    Compare(Box<robosarsa::cli::commands::compare::CompareArgs>),

    /// Inspect a saved table
    Inspect(robosarsa::cli::commands::inspect::InspectArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(robosarsa::cli::log_filter(
            std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(),
        ))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => robosarsa::cli::commands::train::execute(*args),
        Commands::Compare(args) => robosarsa::cli::commands::compare::execute(*args),
        Commands::Inspect(args) => robosarsa::cli::commands::inspect::execute(args),
    }
}
