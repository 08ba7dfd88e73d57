//! Thermal AI test client
//!
//! Checks connectivity to the thermal analysis server, streams synthetic
//! sensor frames to it, and analyses frames stored on disk.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{analyze, run, status};
use std::path::PathBuf;
use std::time::Duration;

/// Thermal AI test client
#[derive(Parser)]
#[command(name = "thermal")]
#[command(author, version, about = "Test client for the Thermal AI leak detection server", long_about = None)]
pub struct Cli {
    /// Server base URL (can also be set via THERMAL_SERVER_URL env var)
    #[arg(long, env = "THERMAL_SERVER_URL", default_value = "http://localhost:5000")]
    pub server_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 15)]
    pub timeout_secs: u64,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that the server is reachable
    Status,

    /// Send synthetic thermal frames to the server
    Run {
        /// Number of frames to send
        #[arg(long, default_value_t = 3)]
        cycles: u32,

        /// Pause between frames in seconds
        #[arg(long, default_value_t = 3)]
        interval_secs: u64,

        /// Chance (0.0-1.0) that a frame contains a simulated leak
        #[arg(long, default_value_t = 0.25)]
        leak_chance: f64,

        /// Seed for reproducible frames
        #[arg(long)]
        seed: Option<u64>,

        /// Sensor identifier sent with each frame
        #[arg(long, default_value = "thermal_camera_01")]
        sensor_id: String,

        /// Sensor location sent with each frame
        #[arg(long, default_value = "main site")]
        location: String,
    },

    /// Analyse a frame stored as JSON
    Analyze {
        /// File holding a JSON array of 64 temperatures or a full request object
        file: PathBuf,

        /// Sensor identifier, used if the file has none
        #[arg(long)]
        sensor_id: Option<String>,

        /// Sensor location, used if the file has none
        #[arg(long)]
        location: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let client = client::ApiClient::new(&cli.server_url, Duration::from_secs(cli.timeout_secs))?;

    match cli.command {
        Commands::Status => {
            if !status::check_connection(&client, cli.format).await? {
                std::process::exit(1);
            }
        }
        Commands::Run {
            cycles,
            interval_secs,
            leak_chance,
            seed,
            sensor_id,
            location,
        } => {
            let opts = run::RunOptions {
                cycles,
                interval: Duration::from_secs(interval_secs),
                leak_chance,
                seed,
                sensor_id,
                location,
            };
            run::run(&client, opts, cli.format).await?;
        }
        Commands::Analyze {
            file,
            sensor_id,
            location,
        } => {
            analyze::analyze_file(&client, &file, sensor_id, location, cli.format).await?;
        }
    }

    Ok(())
}
