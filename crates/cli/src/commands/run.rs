//! Synthetic test run against a live server

use anyhow::Result;
use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::time::Duration;
use thermal_lib::synthetic::{SyntheticFrame, SyntheticGenerator};
use thermal_lib::AnalyzeRequest;

use crate::client::ApiClient;
use crate::commands::status::check_connection;
use crate::output::{
    format_temp, print_alert, print_analysis, print_error, print_info, print_json,
    print_success, print_warning, AlertLevel, OutputFormat,
};

/// Options for `thermal run`
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub cycles: u32,
    pub interval: Duration,
    pub leak_chance: f64,
    pub seed: Option<u64>,
    pub sensor_id: String,
    pub location: String,
}

/// Outcome of a test run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub sent: u32,
    pub failed: u32,
    pub leaks_injected: u32,
}

pub fn build_request(frame: &SyntheticFrame, opts: &RunOptions) -> AnalyzeRequest {
    AnalyzeRequest::new(&frame.samples)
        .with_sensor(opts.sensor_id.clone(), opts.location.clone())
        .with_timestamp(chrono::Utc::now().to_rfc3339())
}

/// Generate frames, post them, and print the server's verdict for each.
///
/// With JSON output, stdout carries only the analysis responses followed by
/// the run summary; failures still go to stderr.
pub async fn run(client: &ApiClient, opts: RunOptions, format: OutputFormat) -> Result<RunSummary> {
    let human = matches!(format, OutputFormat::Table);

    let reachable = if human {
        check_connection(client, OutputFormat::Table).await?
    } else {
        match client.status().await {
            Ok(_) => true,
            Err(e) => {
                print_error(&format!("Connection failed: {:#}", e));
                false
            }
        }
    };
    if !reachable {
        anyhow::bail!("Server at {} is not reachable", client.base_url());
    }

    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let generator = SyntheticGenerator::default().with_leak_chance(opts.leak_chance);
    let mut summary = RunSummary::default();

    if human {
        print_info("Starting test run...");
    }

    for cycle in 1..=opts.cycles {
        let frame = generator.generate(&mut rng);
        if frame.leak_injected {
            summary.leaks_injected += 1;
        }

        if human {
            println!("\n{}", format!("Cycle #{}", cycle).bold());
            if frame.leak_injected {
                println!("{}", "💧 Simulating water leak...".cyan());
            }
            println!("Data:  {} points", frame.samples.len());
            println!(
                "Range: {} - {}",
                format_temp(frame.min_temp()),
                format_temp(frame.max_temp())
            );
        }

        match client.analyze(&build_request(&frame, &opts)).await {
            Ok(response) => {
                summary.sent += 1;
                if human {
                    print_alert(response.leak_probability);
                    if frame.leak_injected
                        && AlertLevel::from_probability(response.leak_probability)
                            == AlertLevel::Normal
                    {
                        print_warning("Simulated leak was not flagged by the server");
                    }
                } else {
                    print_analysis(&response, format);
                }
            }
            Err(e) => {
                summary.failed += 1;
                print_error(&format!("Analysis failed: {:#}", e));
            }
        }

        if cycle < opts.cycles && !opts.interval.is_zero() {
            tokio::time::sleep(opts.interval).await;
        }
    }

    if human {
        println!();
        print_success(&format!(
            "Test finished: {} sent, {} failed, {} simulated leaks",
            summary.sent, summary.failed, summary.leaks_injected
        ));
    } else {
        print_json(&summary);
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(cycles: u32) -> RunOptions {
        RunOptions {
            cycles,
            interval: Duration::ZERO,
            leak_chance: 1.0,
            seed: Some(11),
            sensor_id: "thermal_camera_01".to_string(),
            location: "main site".to_string(),
        }
    }

    #[test]
    fn test_build_request_carries_metadata() {
        let mut rng = StdRng::seed_from_u64(1);
        let frame = SyntheticGenerator::default().generate(&mut rng);
        let request = build_request(&frame, &options(1));

        assert_eq!(request.sensor_id(), "thermal_camera_01");
        assert_eq!(request.location(), "main site");
        assert_eq!(request.point_count(), 64);
        assert!(request.timestamp.is_some());
    }

    #[tokio::test]
    async fn test_run_posts_every_cycle() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/status")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":"ready","timestamp":"2024-01-01T00:00:00+00:00","service":"Thermal AI"}"#)
            .create_async()
            .await;
        let analyze = server
            .mock("POST", "/analyze")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"status":"success","leak_probability":0.95,
                    "analysis":{"min_temperature":16.0,"max_temperature":25.5,
                    "average_temperature":22.9,"cold_spots":9,"risk_level":"high"},
                    "timestamp":"2024-01-01T00:00:00+00:00"}"#,
            )
            .expect(3)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url(), Duration::from_secs(5)).unwrap();
        let summary = run(&client, options(3), OutputFormat::Table).await.unwrap();

        assert_eq!(
            summary,
            RunSummary {
                sent: 3,
                failed: 0,
                leaks_injected: 3
            }
        );
        analyze.assert_async().await;
    }

    #[tokio::test]
    async fn test_run_json_mode_posts_every_cycle() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/status")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":"ready","timestamp":"2024-01-01T00:00:00+00:00","service":"Thermal AI"}"#)
            .create_async()
            .await;
        let analyze = server
            .mock("POST", "/analyze")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"status":"success","leak_probability":0.0,
                    "analysis":{"min_temperature":24.0,"max_temperature":26.0,
                    "average_temperature":25.0,"cold_spots":0,"risk_level":"low"},
                    "timestamp":"2024-01-01T00:00:00+00:00"}"#,
            )
            .expect(2)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url(), Duration::from_secs(5)).unwrap();
        let summary = run(&client, options(2), OutputFormat::Json).await.unwrap();

        assert_eq!(summary.sent, 2);
        assert_eq!(serde_json::to_value(summary).unwrap()["leaks_injected"], 2);
        analyze.assert_async().await;
    }

    #[tokio::test]
    async fn test_run_json_mode_aborts_when_unreachable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/status")
            .with_status(503)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url(), Duration::from_secs(5)).unwrap();
        assert!(run(&client, options(1), OutputFormat::Json).await.is_err());
    }

    #[tokio::test]
    async fn test_run_aborts_when_unreachable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/status")
            .with_status(503)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url(), Duration::from_secs(5)).unwrap();
        assert!(run(&client, options(1), OutputFormat::Table).await.is_err());
    }

    #[tokio::test]
    async fn test_run_counts_failures() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/status")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":"ready","timestamp":"2024-01-01T00:00:00+00:00","service":"Thermal AI"}"#)
            .create_async()
            .await;
        server
            .mock("POST", "/analyze")
            .with_status(500)
            .with_body(r#"{"status":"error","message":"boom"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url(), Duration::from_secs(5)).unwrap();
        let summary = run(&client, options(2), OutputFormat::Table).await.unwrap();
        assert_eq!(summary.sent, 0);
        assert_eq!(summary.failed, 2);
    }
}
