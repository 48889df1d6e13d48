use clap::Parser;
use robosarsa::cli::commands::train::{TrainArgs, execute};
use tempfile::tempdir;

fn parse_args<I, T>(args: I) -> TrainArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    TrainArgs::parse_from(args)
}

#[test]
fn summary_without_extension_appends_json() {
    let tmp = tempdir().unwrap();
    let summary_stem = tmp.path().join("run_overview");
    let data_dir = tmp.path().join("data");

    let args = parse_args([
        "robosarsa-train",
        "--battles",
        "2",
        "--rounds",
        "2",
        "--tick-limit",
        "200",
        "--seed",
        "9",
        "--no-progress",
        "--data-dir",
        data_dir.to_str().unwrap(),
        "--summary",
        summary_stem.to_str().unwrap(),
    ]);

    execute(args).expect("training with summary should succeed");

    let expected_path = summary_stem.with_extension("json");
    assert!(
        expected_path.exists(),
        "expected summary at {}",
        expected_path.display()
    );

    let contents = std::fs::read_to_string(&expected_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["training"]["battles"], 2);
    assert_eq!(parsed["training"]["robot"], "SARSA");
    assert_eq!(parsed["lifetime_battles"], 2);
    assert!(data_dir.join("q.msgpack").is_file());
}

#[test]
fn summary_directory_argument_creates_default_file() {
    let tmp = tempdir().unwrap();
    let summary_dir = tmp.path().join("summaries");
    let summary_arg = format!("{}/", summary_dir.display());
    let data_dir = tmp.path().join("data");

    let args = parse_args([
        "robosarsa-train",
        "--battles",
        "1",
        "--rounds",
        "1",
        "--tick-limit",
        "100",
        "--seed",
        "3",
        "--no-progress",
        "--canonical-sarsa",
        "--data-dir",
        data_dir.to_str().unwrap(),
        "--summary",
        &summary_arg,
    ]);

    execute(args).expect("training with summary directory should succeed");

    let expected_path = summary_dir.join("training_summary.json");
    let contents = std::fs::read_to_string(&expected_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["config"]["bootstrap"], "next_observation");
}

#[test]
fn invalid_epsilon_is_rejected() {
    let tmp = tempdir().unwrap();
    let args = parse_args([
        "robosarsa-train",
        "--epsilon",
        "1.5",
        "--no-progress",
        "--data-dir",
        tmp.path().to_str().unwrap(),
    ]);
    assert!(execute(args).is_err());
}
