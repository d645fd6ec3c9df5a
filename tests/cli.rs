use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::NamedTempFile;

fn ratelimit() -> Command {
    let mut cmd = Command::cargo_bin("ratelimit").unwrap();
    for key in [
        "RATELIMIT_LOG_LEVEL",
        "RATELIMIT_LOG_FORMAT",
        "RATELIMIT_INTERVAL_SECS",
        "RATELIMIT_QUANTUM",
        "RATELIMIT_INITIAL",
    ] {
        cmd.env_remove(key);
    }
    cmd
}

#[test]
fn test_cli_version() {
    ratelimit()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ratelimit 0.1.0"));
}

#[test]
fn test_cli_help() {
    ratelimit()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Token bucket rate limiter with hourly-rate replenishment",
        ));
}

#[test]
fn test_cli_show_config_defaults() {
    let output = ratelimit().arg("show-config").output().unwrap();
    assert!(output.status.success());

    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["limiter"]["interval_secs"], 1);
    assert_eq!(config["limiter"]["quantum"], 3600);
    assert_eq!(config["logging"]["level"], "info");
}

#[test]
fn test_cli_show_config_from_file_and_env() {
    let temp_file = NamedTempFile::new().unwrap();
    fs::write(
        temp_file.path(),
        "[limiter]\ninterval_secs = 60\nquantum = 7200\ninitial = 10\n",
    )
    .unwrap();

    let output = ratelimit()
        .arg("--config")
        .arg(temp_file.path())
        .arg("show-config")
        .env("RATELIMIT_QUANTUM", "9000")
        .output()
        .unwrap();
    assert!(output.status.success());

    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["limiter"]["interval_secs"], 60);
    assert_eq!(config["limiter"]["quantum"], 9000);
    assert_eq!(config["limiter"]["initial"], 10);
}

#[test]
fn test_cli_rejects_invalid_config() {
    ratelimit()
        .arg("show-config")
        .env("RATELIMIT_INTERVAL_SECS", "0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid limiter configuration"));
}

#[test]
fn test_cli_simulate_within_capacity() {
    let output = ratelimit()
        .args(["simulate", "--workers", "3", "--requests", "5", "--max-tokens", "4"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["workers"], 3);
    assert_eq!(report["requested"], report["granted"]);
    assert_eq!(report["stats"]["throttled_calls"], 0);
}

#[test]
fn test_cli_simulate_exhausts_bucket() {
    let output = ratelimit()
        .args(["simulate", "--workers", "4", "--requests", "10", "--max-tokens", "5"])
        .env("RATELIMIT_INTERVAL_SECS", "3600")
        .env("RATELIMIT_QUANTUM", "100")
        .env("RATELIMIT_INITIAL", "10")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["granted"], 10);
    assert_eq!(report["stats"]["capacity"], 0);
}

#[test]
fn test_cli_simulate_rejects_zero_max_tokens() {
    ratelimit()
        .args(["simulate", "--max-tokens", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--max-tokens must be greater than zero"));
}
