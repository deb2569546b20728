//! Runs the built binary

use std::process::Command;

use crate::common::config_file;

fn scenesweep() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_scenesweep"));
    command.args(["--no-color", "--log-level", "off"]);
    command
}

#[test]
fn test_demo_json_reports_clean_run() {
    let output = scenesweep()
        .args([
            "demo",
            "--scenes",
            "2",
            "--depth",
            "2",
            "--json",
            "--gc-delay-ms",
            "0",
            "--verify-delay-ms",
            "0",
        ])
        .output()
        .unwrap();

    assert!(output.status.success(), "{:?}", output);
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["report"]["status"]["all_clean"], true);
    assert_eq!(json["host"]["disposed"], json["host"]["disposables"]);
    assert_eq!(json["host"]["collections"], 2);
}

#[test]
fn test_demo_table_output() {
    let output = scenesweep()
        .args(["demo", "--fail-every", "3", "--gc-delay-ms", "0", "--verify-delay-ms", "0"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("garbage-collection"));
    assert!(stdout.contains("eventListeners"));
    assert!(stdout.contains("elapsed:"));
}

#[test]
fn test_status_of_fresh_process_is_clean() {
    let output = scenesweep().args(["status", "--json"]).output().unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"]["all_clean"], true);
}

#[test]
fn test_missing_config_file_fails() {
    let output = scenesweep()
        .args(["--config-file", "/no/such/scenesweep.toml", "status"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_config_file_delays_are_used() {
    let file = config_file("log-level = \"off\"\n[cleanup]\ngc_delay_ms = 0\nverify_delay_ms = 0\n");

    let output = scenesweep()
        .args(["-c"])
        .arg(file.path())
        .args(["demo", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json["report"]["elapsed"].as_u64().unwrap() < 250);
}

#[test]
fn test_oversized_demo_is_rejected() {
    let output = scenesweep()
        .args(["demo", "--children", "100", "--depth", "5"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
}
