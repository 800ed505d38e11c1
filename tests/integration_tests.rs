//! Integration tests for the travelplanner CLI

use std::process::Command;

fn travelplanner() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_travelplanner"));
    command
        .env_remove("OPENAI_API_KEY")
        .env_remove("TRAVELPLANNER__LLM__API_KEY");
    command
}

/// Test that the CLI shows help with explicit help flag
#[test]
fn test_cli_help() {
    let output = travelplanner()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Day-by-day travel itineraries"));
    assert!(stdout.contains("plan"));
    assert!(stdout.contains("cities"));
}

/// Test city lookup with a partial name
#[test]
fn test_cities_partial_match() {
    let output = travelplanner()
        .args(["cities", "sevi"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.lines().any(|line| line == "Sevilla"));
}

/// Test city lookup for a destination outside the catalogue
#[test]
fn test_cities_unlisted() {
    let output = travelplanner()
        .args(["cities", "atlantis"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("'Atlantis' is not in the catalogue"));
}

/// Test that planning without an API key is a configuration error
#[test]
fn test_plan_without_api_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("missing.toml");

    let output = travelplanner()
        .arg("--config")
        .arg(&config_path)
        .args(["plan", "--destination", "Madrid", "--days", "3", "--budget", "900"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Missing API key"), "got: {stderr}");
}

/// Test that invalid preferences are rejected before any provider call
#[test]
fn test_plan_rejects_zero_days() {
    let output = travelplanner()
        .args(["plan", "--destination", "Madrid", "--days", "0"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Duration must be at least 1 day"), "got: {stderr}");
}

/// Test that an unknown accommodation type is reported by argument parsing
#[test]
fn test_plan_rejects_unknown_accommodation() {
    let output = travelplanner()
        .args(["plan", "--destination", "Madrid", "--accommodation", "castle"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown accommodation type"));
}
