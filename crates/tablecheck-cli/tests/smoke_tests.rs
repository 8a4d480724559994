//! Smoke tests for the tablecheck CLI
//!
//! Suites run with `--demo` so no chromium is needed.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command for the tablecheck binary
fn tablecheck() -> Command {
    let mut cmd = Command::cargo_bin("tablecheck").expect("tablecheck binary should exist");
    cmd.env_remove("TABLECHECK_CONFIG")
        .env_remove("TABLECHECK_URL")
        .env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    tablecheck()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    tablecheck()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("multi-select"))
        .stdout(predicate::str::contains("--scenario"))
        .stdout(predicate::str::contains("--demo"));
}

#[test]
fn test_list_builtin_scenarios() {
    tablecheck()
        .args(["--list", "--color", "never"])
        .assert()
        .success()
        .stdout(predicate::str::contains("flag-filter"))
        .stdout(predicate::str::contains("ytd-multiselect"));
}

// ============================================================================
// Suite Runs
// ============================================================================

#[test]
fn test_demo_suite_passes() {
    let dir = TempDir::new().unwrap();
    tablecheck()
        .args(["--demo", "--color", "never", "--screenshot-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS flag-filter"))
        .stdout(predicate::str::contains("PASS ytd-multiselect"))
        .stdout(predicate::str::contains("2 passed, 0 failed"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_demo_json_report() {
    let output = tablecheck()
        .args(["--demo", "--json", "--scenario", "ytd-multiselect"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["scenarios"].as_array().unwrap().len(), 1);
    assert_eq!(json["scenarios"][0]["name"], "ytd-multiselect");
    assert_eq!(json["scenarios"][0]["passed"], true);
}

#[test]
fn test_failed_scenario_exits_nonzero_with_screenshot() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("suite.yaml");
    fs::write(
        &config,
        format!(
            "screenshot_dir: {}\nscenarios:\n  - name: sector\n    column_key: sector\n    control: {{ kind: header, column_key: sector }}\n    format: {{ kind: raw }}\n    all_label: All Sector\n",
            dir.path().join("shots").display()
        ),
    )
    .unwrap();

    tablecheck()
        .args(["--demo", "--color", "never", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stdout(predicate::str::contains("FAIL sector"))
        .stdout(predicate::str::contains("aborted: Timed out"))
        .stderr(predicate::str::contains("Error: 1 scenario(s) failed"));
    assert!(dir.path().join("shots").join("sector_error.png").exists());
}

// ============================================================================
// Error Handling
// ============================================================================

#[test]
fn test_missing_config_file() {
    tablecheck()
        .args(["--demo", "--config", "/nonexistent/suite.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: I/O error"));
}

#[test]
fn test_invalid_config() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("suite.yaml");
    fs::write(&config, "scenarios: []\n").unwrap();
    tablecheck()
        .args(["--demo", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one scenario is required"));
}

#[test]
fn test_unknown_scenario() {
    tablecheck()
        .args(["--demo", "--scenario", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown scenario 'nope'"));
}

#[test]
fn test_invalid_color_value() {
    tablecheck().args(["--color", "sometimes"]).assert().failure();
}
