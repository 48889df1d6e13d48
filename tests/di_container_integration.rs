//! Integration tests for dependency injection.
//!
//! The container wires the repository into every agent it creates, so a
//! whole train-save-reload cycle can run against memory.

use std::path::Path;

use robosarsa::{
    adapters::InMemoryRepository,
    app::{AgentConfig, App},
    arena::{SandboxArena, SandboxConfig},
    ports::NullObserver,
};

fn arena_config(seed: u64) -> SandboxConfig {
    SandboxConfig::default()
        .with_rounds(2)
        .with_tick_limit(250)
        .with_seed(Some(seed))
}

#[test]
fn test_app_with_in_memory_repository() {
    let repo = InMemoryRepository::new();
    let app = App::for_testing()
        .with_repository(repo.clone())
        .with_default_seed(42)
        .build();
    let config = AgentConfig::new().with_data_dir("robot");

    let arena = arena_config(42);
    let mut agent = app.create_agent(&config, arena.arena()).unwrap();
    let mut sim = SandboxArena::new(arena).unwrap();
    agent.run(&mut sim, &mut NullObserver).unwrap();

    // The agent saved on its own when the battle ended
    assert!(repo.contains(Path::new("robot/q.msgpack")));

    let reloaded = app.create_agent(&config, arena_config(42).arena()).unwrap();
    assert_eq!(reloaded.table(), agent.table());
    assert_eq!(reloaded.metadata().battles, 1);
}

#[test]
fn test_deterministic_training_with_seed() {
    let config = AgentConfig::new().with_seed(7);
    let play = || {
        let app = App::for_testing()
            .with_repository(InMemoryRepository::new())
            .build();
        let arena = arena_config(7);
        let mut agent = app.create_agent(&config, arena.arena()).unwrap();
        let mut sim = SandboxArena::new(arena).unwrap();
        let report = agent.run(&mut sim, &mut NullObserver).unwrap();
        (report, agent.table().stats())
    };

    assert_eq!(play(), play());
}

#[test]
fn test_separate_data_dirs_do_not_share_tables() {
    let repo = InMemoryRepository::new();
    let app = App::for_testing()
        .with_repository(repo.clone())
        .with_default_seed(1)
        .build();

    let arena = arena_config(1);
    let mut first = app
        .create_agent(&AgentConfig::new().with_data_dir("a"), arena.arena())
        .unwrap();
    let mut sim = SandboxArena::new(arena).unwrap();
    first.run(&mut sim, &mut NullObserver).unwrap();

    let second = app
        .create_agent(&AgentConfig::new().with_data_dir("b"), arena_config(1).arena())
        .unwrap();
    assert!(second.table().is_empty());
    assert_eq!(repo.count(), 1);
}
