use clap::Parser;
use smartcab::cli::commands::train::{TrainArgs, execute};
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

    let args = parse_args([
        "smartcab-train",
        "--trials",
        "5",
        "--test-trials",
        "2",
        "--seed",
        "42",
        "--quiet",
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
    assert_eq!(parsed["training"]["trials"], 5);
    assert_eq!(parsed["testing"]["trials"], 2);
    assert_eq!(parsed["final_epsilon"], 0.0);
}

#[test]
fn summary_directory_argument_creates_default_file() {
    let tmp = tempdir().unwrap();
    let summary_dir = tmp.path().join("summaries");
    let summary_arg = format!("{}/", summary_dir.display());

    let args = parse_args([
        "smartcab-train",
        "--trials",
        "3",
        "--test-trials",
        "0",
        "--seed",
        "7",
        "--quiet",
        "--summary",
        &summary_arg,
    ]);

    execute(args).expect("training with directory summary should succeed");

    let expected_path = summary_dir.join("training_summary.json");
    assert!(
        expected_path.exists(),
        "expected summary at {}",
        expected_path.display()
    );

    let contents = std::fs::read_to_string(&expected_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["training"]["trials"], 3);
}

#[test]
fn defaults_match_the_training_harness() {
    let args = parse_args(["smartcab-train"]);
    assert_eq!(args.trials, 100);
    assert_eq!(args.test_trials, 10);
    assert_eq!(args.epsilon, 1.0);
    assert_eq!(args.alpha, 0.5);
    assert_eq!(args.decay, "linear:0.01");
}

#[test]
fn bad_decay_flag_is_rejected() {
    let tmp = tempdir().unwrap();
    let args = parse_args([
        "smartcab-train",
        "--trials",
        "1",
        "--quiet",
        "--decay",
        "exponential:0.9",
        "--summary",
        tmp.path().join("unused").to_str().unwrap(),
    ]);

    assert!(execute(args).is_err());
}
