//! Smoke tests through the library entry point.

use std::io::Write;

use concept_cli::{run_with_args, CliError};

fn concepts(args: &[&str]) -> Result<(), CliError> {
    run_with_args(std::iter::once("concepts").chain(args.iter().copied()))
}

#[test]
fn run_prints_every_format() {
    for format in ["table", "json", "yaml"] {
        concepts(&["--output", format, "run", "--seed", "3", "--levels", "1"]).unwrap();
    }
}

#[test]
fn run_with_data_file_and_saved_bundle() {
    let mut data = tempfile::NamedTempFile::new().unwrap();
    writeln!(data, "-1.0, -0.5, 0.0, 0.5, 1.0\n0.25 0.75").unwrap();
    let dir = tempfile::tempdir().unwrap();
    let save = dir.path().join("bundle.json");

    concepts(&[
        "run",
        "--levels",
        "1",
        "--data",
        data.path().to_str().unwrap(),
        "--save",
        save.to_str().unwrap(),
    ])
    .unwrap();

    let bundle: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&save).unwrap()).unwrap();
    assert_eq!(bundle["seed"], 0);
    assert_eq!(bundle["observation"]["shape"][0], 7);
    assert!(bundle["run_id"].is_string());
}

#[test]
fn run_with_config_file() {
    let mut config = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        config,
        "model:\n  num_levels: 2\n  concept_count:\n    type: fixed\n    value: 2\nsampler:\n  num_samples: 20\ntheorems:\n  count: 1\ninput:\n  start: -1.0\n  end: -0.5\n  points: 20\n"
    )
    .unwrap();
    concepts(&[
        "--config",
        config.path().to_str().unwrap(),
        "--output",
        "json",
        "run",
    ])
    .unwrap();
}

#[test]
fn export_writes_lean_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = tempfile::NamedTempFile::new().unwrap();
    writeln!(config, "model:\n  concept_count:\n    type: fixed\n    value: 2\n").unwrap();

    concepts(&[
        "--config",
        config.path().to_str().unwrap(),
        "export",
        "--levels",
        "1",
        "--simplify",
        "--out-dir",
        dir.path().to_str().unwrap(),
    ])
    .unwrap();

    for name in ["c0.0.lean", "c0.1.lean"] {
        let source = std::fs::read_to_string(dir.path().join(name)).unwrap();
        assert!(source.starts_with("import data.real.basic"));
        assert!(source.contains("theorem concept_property"));
    }
}

#[test]
fn bad_arguments_and_missing_files_fail() {
    assert!(matches!(
        concepts(&["run", "--seed", "minus-one"]),
        Err(CliError::InvalidArgument(_))
    ));
    assert!(matches!(
        concepts(&["run", "--data", "/nonexistent/concepts/data.txt"]),
        Err(CliError::Io(_))
    ));
    assert!(concepts(&["--help"]).is_ok());
}
