//! Integration test: the full command path from file to CSV.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use taukin_cli::{execute, Cli};

const MODEL: &str = r#"{
    "Groups": {
        "g": {
            "Species": { "stim": 0 },
            "Reacs": { "resp": { "subs": ["stim"], "KA": 1, "tau": 0.01 } }
        }
    }
}"#;

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("taukin-cli-{}-{name}", std::process::id()))
}

#[test]
fn runs_stimulus_and_writes_selected_columns() {
    let model = scratch("model.json");
    let csv = scratch("out.csv");
    fs::write(&model, MODEL).unwrap();

    let cli = Cli::try_parse_from([
        "taukin".to_string(),
        model.display().to_string(),
        "--runtime".into(),
        "100".into(),
        "--stimulus".into(),
        "stim".into(),
        "1".into(),
        "20".into(),
        "60".into(),
        "--plots".into(),
        "stim".into(),
        "--output".into(),
        csv.display().to_string(),
    ])
    .unwrap();
    let result = execute(&cli);
    let text = fs::read_to_string(&csv);
    let _ = fs::remove_file(&model);
    let _ = fs::remove_file(&csv);
    result.unwrap();

    let text = text.unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "time,stim");
    assert_eq!(lines.len(), 101);
    assert_eq!(lines[20], "19,0");
    assert_eq!(lines[21], "20,1");
    assert_eq!(lines[60], "59,1");
    assert_eq!(lines[61], "60,0");
}

#[test]
fn check_only_without_runtime() {
    let model = scratch("check.json");
    fs::write(&model, MODEL).unwrap();
    let cli = Cli::try_parse_from(["taukin".to_string(), model.display().to_string()]).unwrap();
    let result = execute(&cli);
    let _ = fs::remove_file(&model);
    assert!(result.is_ok());
}

#[test]
fn broken_model_reports_offending_name() {
    let model = scratch("broken.json");
    fs::write(
        &model,
        r#"{"Groups":{"g":{"Eqns":{"x":"y + 1"}}}}"#,
    )
    .unwrap();
    let cli = Cli::try_parse_from(["taukin".to_string(), model.display().to_string()]).unwrap();
    let result = execute(&cli);
    let _ = fs::remove_file(&model);
    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("'y'"), "{message}");
}
