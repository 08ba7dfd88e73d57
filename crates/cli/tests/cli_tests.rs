//! CLI integration tests

use std::process::Command;

fn thermal(args: &[&str]) -> std::process::Output {
    Command::new("cargo")
        .args(["run", "-q", "-p", "thermal-cli", "--"])
        .args(args)
        .output()
        .expect("Failed to execute command")
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = thermal(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("Thermal AI"), "Should show app name");
    assert!(stdout.contains("status"), "Should show status command");
    assert!(stdout.contains("run"), "Should show run command");
    assert!(stdout.contains("analyze"), "Should show analyze command");
    assert!(stdout.contains("--server-url"), "Should show server-url option");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = thermal(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("thermal"), "Should show binary name");
}

/// Test run subcommand help
#[test]
fn test_run_help() {
    let output = thermal(&["run", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Run help should succeed");
    assert!(stdout.contains("--cycles"), "Should show cycles option");
    assert!(stdout.contains("--leak-chance"), "Should show leak-chance option");
    assert!(stdout.contains("--seed"), "Should show seed option");
}

/// Test analyze subcommand help
#[test]
fn test_analyze_help() {
    let output = thermal(&["analyze", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Analyze help should succeed");
    assert!(stdout.contains("<FILE>"), "Should show file argument");
    assert!(stdout.contains("--sensor-id"), "Should show sensor-id option");
}

/// Analyze without a file argument is a usage error
#[test]
fn test_analyze_requires_file() {
    let output = thermal(&["analyze"]);
    assert!(!output.status.success());
}

/// Status against a closed port fails
#[test]
fn test_status_unreachable_server() {
    let output = thermal(&[
        "--server-url",
        "http://127.0.0.1:9",
        "--timeout-secs",
        "2",
        "status",
    ]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("Connection failed"));
}

/// JSON output of `run` is a stream of JSON documents and nothing else
#[test]
fn test_run_json_output_is_machine_readable() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/status")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"ready","timestamp":"2024-01-01T00:00:00+00:00","service":"Thermal AI"}"#)
        .create();
    server
        .mock("POST", "/analyze")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"status":"success","leak_probability":0.95,
                "analysis":{"min_temperature":16.0,"max_temperature":25.5,
                "average_temperature":22.9,"cold_spots":9,"risk_level":"high"},
                "timestamp":"2024-01-01T00:00:00+00:00"}"#,
        )
        .expect(2)
        .create();

    let url = server.url();
    let output = thermal(&[
        "--server-url",
        &url,
        "--format",
        "json",
        "run",
        "--cycles",
        "2",
        "--interval-secs",
        "0",
        "--leak-chance",
        "1.0",
        "--seed",
        "3",
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let documents: Vec<serde_json::Value> = serde_json::Deserializer::from_str(&stdout)
        .into_iter::<serde_json::Value>()
        .collect::<Result<_, _>>()
        .expect("stdout should only contain JSON");

    assert_eq!(documents.len(), 3);
    assert_eq!(documents[0]["analysis"]["risk_level"], "high");
    assert_eq!(documents[2]["sent"], 2);
    assert_eq!(documents[2]["leaks_injected"], 2);
}
