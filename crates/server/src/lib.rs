//! Thermal analysis HTTP server
//!
//! Exposes the leak detector over HTTP together with health, readiness
//! and Prometheus metrics endpoints.

pub mod api;
pub mod config;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// Bind `addr` and serve `state` until `shutdown` resolves
pub async fn serve<F>(addr: &str, state: Arc<api::AppState>, shutdown: F) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let app = api::create_router(state);

    info!(addr = %addr, "Starting API server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
