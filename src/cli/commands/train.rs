//! Train command - Run the SARSA robot through sandbox battles

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use super::{AgentArgs, ArenaArgs};
use crate::{
    app::{AgentConfig, App},
    cli::output::{format_number, format_percent, print_section, print_stats_table, print_subsection},
    pipeline::{
        BattlePipeline, JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver,
        SharedObserver, TrainingConfig, TrainingResult,
    },
    sarsa::TableStats,
};

#[derive(Parser, Debug)]
#[command(about = "Train the SARSA robot", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Number of battles to fight
    #[arg(long, short = 'b', default_value_t = 10)]
    pub battles: usize,

    #[command(flatten)]
    pub arena: ArenaArgs,

    #[command(flatten)]
    pub agent: AgentArgs,

    /// Optional file for JSONL step records
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

/// Everything a training run produced, as written to `--summary`.
#[derive(Debug, Clone, Serialize)]
pub struct TrainSummary {
    pub training: TrainingResult,
    pub metrics: MetricsSummary,
    pub table: TableStats,
    pub knowledge_path: PathBuf,
    /// Battles the saved table has seen across all sessions
    pub lifetime_battles: u64,
    pub seed: Option<u64>,
    pub config: AgentConfig,
}

fn summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Trailing separator or no file name means a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

/// Train with the given container and return the summary without printing.
pub fn run(app: &App, args: &TrainArgs) -> Result<TrainSummary> {
    let config = args.agent.agent_config(args.arena.seed)?;
    let training = TrainingConfig {
        battles: args.battles,
        arena: args.arena.sandbox_config(),
    };
    let mut agent = app.create_agent(&config, training.arena.arena())?;

    let metrics = SharedObserver::new(MetricsObserver::new());
    let metrics_handle = metrics.handle();

    let mut pipeline = BattlePipeline::new(training).with_observer(Box::new(metrics));
    if !args.no_progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.observations {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("failed to open observations file {}", path.display()))?;
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    let result = pipeline.run(&mut agent)?;
    let metrics = metrics_handle
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .summary();

    Ok(TrainSummary {
        training: result,
        metrics,
        table: agent.table().stats(),
        knowledge_path: config.knowledge_path(),
        lifetime_battles: agent.metadata().battles,
        seed: app.seed_for(&config),
        config,
    })
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let app = App::new();
    let summary = run(&app, &args)?;

    print_section("Training Results");
    print_stats_table(&[
        ("Battles", format_number(summary.training.battles as u64)),
        ("Rounds won", summary.training.wins.to_string()),
        ("Rounds lost", summary.training.deaths.to_string()),
        ("Win rate", format_percent(summary.training.win_rate)),
        ("Steps", format_number(summary.training.steps)),
        ("Total reward", format!("{:.1}", summary.training.total_reward)),
    ]);

    print_subsection("Policy");
    print_stats_table(&[
        ("Explored", format_number(summary.metrics.explored)),
        ("Greedy", format_number(summary.metrics.greedy)),
        ("Fallback", format_number(summary.metrics.fallback)),
        ("Greedy rate", format_percent(summary.metrics.greedy_rate)),
    ]);

    print_subsection("Knowledge");
    print_stats_table(&[
        ("File", summary.knowledge_path.display().to_string()),
        ("Observations", format_number(summary.table.observations as u64)),
        ("State-actions", format_number(summary.table.state_actions as u64)),
        ("Lifetime battles", format_number(summary.lifetime_battles)),
    ]);

    if let Some(raw) = &args.summary {
        let path = summary_path(raw);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let file = File::create(&path)
            .with_context(|| format!("failed to create summary {}", path.display()))?;
        to_writer_pretty(file, &summary)?;
        println!("\nSummary written to: {}", path.display());
    }

    Ok(())
}
