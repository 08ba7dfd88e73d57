//! Thermal AI server
//!
//! Receives 8x8 thermal frames from sensors over HTTP and scores them
//! for water leaks.

use anyhow::Result;
use std::sync::Arc;
use thermal_lib::{health::HealthRegistry, observability::ServiceMetrics};
use thermal_server::{api, config::ServerConfig};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting thermal-server");

    let config = ServerConfig::load()?;
    let addr = config.bind_addr();
    info!(addr = %addr, service = %config.service_name, "Server configured");

    let state = Arc::new(api::AppState::new(
        HealthRegistry::new(),
        ServiceMetrics::new(),
        config.service_name.clone(),
    ));
    api::initialize(&state).await;

    let logger = state.logger.clone();
    logger.log_startup(SERVER_VERSION, &addr);

    let result = thermal_server::serve(&addr, state, shutdown_signal()).await;
    match &result {
        Ok(()) => logger.log_shutdown("SIGINT received"),
        Err(e) => {
            error!(error = %e, "Server exited with error");
            logger.log_shutdown("server error");
        }
    }
    result
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
