//! Compare command - Pit the trained robot and the baseline against the same battles

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use super::{AgentArgs, ArenaArgs};
use crate::{
    app::App,
    cli::output::{format_number, format_percent, print_section},
    pipeline::{ComparisonFramework, ComparisonResult, TrainingConfig},
};

#[derive(Parser, Debug)]
#[command(about = "Compare the SARSA robot with the baseline robot")]
pub struct CompareArgs {
    /// Number of battles per robot
    #[arg(long, short = 'b', default_value_t = 10)]
    pub battles: usize,

    #[command(flatten)]
    pub arena: ArenaArgs,

    #[command(flatten)]
    pub agent: AgentArgs,

    /// Write the comparison results to this JSON file
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Run both robots and return their results. The saved table is read but
/// never updated.
pub fn run(app: &App, args: &CompareArgs) -> Result<ComparisonResult> {
    let config = args.agent.agent_config(args.arena.seed)?;
    let training = TrainingConfig {
        battles: args.battles,
        arena: args.arena.sandbox_config(),
    };

    let agent = app.create_detached_agent(&config, training.arena.arena())?;
    let baseline = app.create_baseline(app.seed_for(&config));

    let result = ComparisonFramework::new(training)
        .with_robot(Box::new(agent))
        .with_robot(Box::new(baseline))
        .compare()?;
    Ok(result)
}

pub fn execute(args: CompareArgs) -> Result<()> {
    let app = App::new();
    let result = run(&app, &args)?;

    print_section("Comparison Results");
    println!(
        "{:<10} {:>8} {:>8} {:>8} {:>10} {:>12}",
        "Robot", "Wins", "Deaths", "Win %", "Steps", "Reward"
    );
    for robot in &result.results {
        println!(
            "{:<10} {:>8} {:>8} {:>8} {:>10} {:>12.1}",
            robot.robot,
            robot.wins,
            robot.deaths,
            format_percent(robot.win_rate),
            format_number(robot.steps),
            robot.total_reward
        );
    }

    if let Some(leader) = result.leader() {
        println!("\nLeader: {}", leader.robot);
    }

    if let Some(path) = &args.output {
        let file = std::fs::File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, &result)?;
        println!("\nResults exported to: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryRepository;

    #[test]
    fn test_compare_leaves_knowledge_untouched() {
        let repo = InMemoryRepository::new();
        let app = App::for_testing().with_repository(repo.clone()).build();
        let args = CompareArgs {
            battles: 1,
            arena: ArenaArgs {
                rounds: 2,
                opponents: 1,
                tick_limit: 200,
                seed: Some(23),
            },
            agent: AgentArgs::default(),
            output: None,
        };

        let result = run(&app, &args).unwrap();
        assert_eq!(result.results.len(), 2);
        assert!(result.get("SARSA").is_some());
        assert!(result.get("Simple").is_some());
        assert_eq!(repo.count(), 0);
    }
}
