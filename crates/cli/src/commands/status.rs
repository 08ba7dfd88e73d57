//! Server connectivity check

use anyhow::Result;
use colored::Colorize;

use crate::client::ApiClient;
use crate::output::{print_error, print_json, print_success, OutputFormat};

/// Query `/status` and report whether the server is reachable.
///
/// Returns `Ok(false)` when the server could not be reached or answered
/// with an error; the failure is printed rather than propagated.
pub async fn check_connection(client: &ApiClient, format: OutputFormat) -> Result<bool> {
    match client.status().await {
        Ok(status) => {
            match format {
                OutputFormat::Json => print_json(&status),
                OutputFormat::Table => {
                    print_success(&format!(
                        "Connected to {} ({})",
                        status.service.cyan(),
                        client.base_url()
                    ));
                    println!("Status:    {}", status.status);
                    println!("Timestamp: {}", status.timestamp);
                }
            }
            Ok(true)
        }
        Err(e) => {
            print_error(&format!("Connection failed: {:#}", e));
            Ok(false)
        }
    }
}
