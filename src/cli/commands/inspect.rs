//! Inspect command - Show what a saved table contains

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

use crate::{
    app::{AgentConfig, App},
    cli::output::{format_number, print_kv, print_section, print_stats_table, print_subsection},
    observation::Observation,
    sarsa::{ActionValueTable, KnowledgeMetadata},
};

#[derive(Parser, Debug)]
#[command(about = "Inspect a saved SARSA table")]
pub struct InspectArgs {
    /// Directory holding the knowledge file
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Knowledge file name inside the data directory
    #[arg(long, default_value = "q.msgpack")]
    pub knowledge_file: PathBuf,

    /// Number of highest-valued state-action pairs to list
    #[arg(long, short = 'n', default_value_t = 10)]
    pub top: usize,
}

/// Load the table without falling back to an empty one.
pub fn load(app: &App, args: &InspectArgs) -> Result<(ActionValueTable, KnowledgeMetadata)> {
    let path = AgentConfig::new()
        .with_data_dir(&args.data_dir)
        .with_knowledge_file(&args.knowledge_file)
        .knowledge_path();
    let repository = app.table_repository();
    if !repository.exists(&path) {
        bail!("no knowledge file at {}", path.display());
    }

    let saved = repository
        .load(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let table = saved.to_table()?;
    Ok((table, saved.metadata))
}

fn describe(observation: &Observation) -> String {
    let own = format!(
        "pos=({:.0},{:.0}) energy={:.1} heading={:.0} gun={:.0}",
        observation.x, observation.y, observation.energy, observation.heading, observation.gun_heading
    );
    match &observation.opponent {
        Some(opponent) => format!(
            "{own} | opponent dist={:.0} bearing={:.0} heading={:.0} energy={:.1}",
            opponent.distance, opponent.bearing, opponent.heading, opponent.energy
        ),
        None => format!("{own} | no opponent"),
    }
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let app = App::new();
    let (table, metadata) = load(&app, &args)?;
    let stats = table.stats();
    let fmt_value = |value: Option<f64>| value.map_or_else(|| "-".to_string(), |v| format!("{v:.4}"));

    print_section("Knowledge");
    print_stats_table(&[
        ("Battles", format_number(metadata.battles)),
        ("Steps", format_number(metadata.steps)),
        ("Observations", format_number(stats.observations as u64)),
        ("State-actions", format_number(stats.state_actions as u64)),
        ("Buckets in use", format_number(stats.buckets as u64)),
        ("Min value", fmt_value(stats.min_value)),
        ("Max value", fmt_value(stats.max_value)),
        ("Mean value", fmt_value(stats.mean_value)),
    ]);

    if args.top > 0 && !table.is_empty() {
        print_subsection(&format!("Top {} state-action values", args.top));
        for (observation, action, value) in table.top_entries(args.top) {
            print_kv(&format!("{value:.4}"), &format!("{action} @ {}", describe(&observation)));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        action::Action,
        adapters::InMemoryRepository,
        arena::Telemetry,
        sarsa::KnowledgeStore,
    };

    fn args() -> InspectArgs {
        InspectArgs {
            data_dir: PathBuf::from("data"),
            knowledge_file: PathBuf::from("q.msgpack"),
            top: 5,
        }
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let app = App::for_testing()
            .with_repository(InMemoryRepository::new())
            .build();
        assert!(load(&app, &args()).is_err());
    }

    #[test]
    fn test_loads_saved_table() {
        let repo = InMemoryRepository::new();
        let app = App::for_testing().with_repository(repo).build();
        let mut table = ActionValueTable::default();
        table.update(
            Observation::observe(&Telemetry::default(), None),
            Action::MoveForward(20.0),
            1.5,
        );
        KnowledgeStore::new(app.table_repository(), "data/q.msgpack")
            .save(&table, &KnowledgeMetadata { battles: 2, steps: 40 })
            .unwrap();

        let (loaded, metadata) = load(&app, &args()).unwrap();
        assert_eq!(loaded, table);
        assert_eq!(metadata.steps, 40);
    }

    #[test]
    fn test_describe_mentions_missing_opponent() {
        let observation = Observation::observe(&Telemetry::default(), None);
        assert!(describe(&observation).ends_with("no opponent"));
    }
}
