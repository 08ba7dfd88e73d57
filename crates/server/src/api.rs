//! HTTP API for thermal analysis, health checks and Prometheus metrics

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use thermal_lib::{
    health::{components, ComponentStatus, HealthRegistry},
    observability::{ServiceMetrics, StructuredLogger},
    synthetic::{grid_with_cell, leak_grid, uniform_grid},
    AnalyzeRequest, AnalyzeResponse, DetectionError, ErrorResponse, LeakDetector, ServiceInfo,
    StatusResponse,
};
use tracing::{error, info};

/// Version reported by `GET /`
pub const API_VERSION: &str = "2.0";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub health_registry: HealthRegistry,
    pub metrics: ServiceMetrics,
    pub logger: StructuredLogger,
    pub detector: LeakDetector,
    pub service_name: String,
}

impl AppState {
    pub fn new(
        health_registry: HealthRegistry,
        metrics: ServiceMetrics,
        service_name: impl Into<String>,
    ) -> Self {
        let service_name = service_name.into();
        Self {
            health_registry,
            metrics,
            logger: StructuredLogger::new(service_name.clone()),
            detector: LeakDetector::default(),
            service_name,
        }
    }
}

/// Run the detector against known frames and check the expected outcome
pub fn self_check(detector: &LeakDetector) -> Result<(), String> {
    let cases = [
        ("uniform", uniform_grid(25.0), 0.0),
        ("single_cold_cell", grid_with_cell(25.0, 3, 3, 15.0), 0.7),
        ("leak_block", leak_grid(25.0, 16.5), 0.95),
    ];

    for (name, samples, expected) in cases {
        let result = detector
            .detect(&samples)
            .map_err(|e| format!("{} frame rejected: {}", name, e))?;
        if result.leak_probability != expected {
            return Err(format!(
                "{} frame scored {}, expected {}",
                name, result.leak_probability, expected
            ));
        }
    }
    Ok(())
}

/// Register components, verify the detector and mark the service ready
pub async fn initialize(state: &AppState) {
    let registry = &state.health_registry;
    registry.register(components::API).await;
    registry.register(components::DETECTOR).await;

    match self_check(&state.detector) {
        Ok(()) => info!("Detector self-check passed"),
        Err(reason) => {
            error!(reason = %reason, "Detector self-check failed");
            registry.set_unhealthy(components::DETECTOR, reason).await;
        }
    }

    registry.set_ready(true).await;
}

/// Service description
async fn home() -> Json<ServiceInfo> {
    let endpoints = BTreeMap::from([
        (
            "/analyze".to_string(),
            "POST - Analyze thermal data".to_string(),
        ),
        ("/status".to_string(), "GET - Server status".to_string()),
        ("/".to_string(), "GET - Home page".to_string()),
    ]);

    Json(ServiceInfo {
        status: "running".to_string(),
        service: "Thermal AI Cloud Server".to_string(),
        version: API_VERSION.to_string(),
        endpoints,
    })
}

/// Lightweight status used by clients to check connectivity
async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let readiness = state.health_registry.readiness().await;
    let status = if readiness.ready { "ready" } else { "starting" };

    Json(StatusResponse {
        status: status.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        service: state.service_name.clone(),
    })
}

fn error_status(err: &DetectionError) -> StatusCode {
    match err {
        DetectionError::InsufficientData { .. } => StatusCode::BAD_REQUEST,
        DetectionError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

/// Unparseable JSON is a bad request; other rejections keep axum's status
fn rejection_status(rejection: &JsonRejection) -> StatusCode {
    match rejection {
        JsonRejection::JsonSyntaxError(_) => StatusCode::BAD_REQUEST,
        other => other.status(),
    }
}

/// Run leak detection on a posted frame
async fn analyze(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            state.metrics.record_rejection("malformed_body");
            let status = rejection_status(&rejection);
            let body = ErrorResponse::new(rejection.body_text());
            return (status, Json(body)).into_response();
        }
    };

    let sensor_id = request.sensor_id();
    state
        .logger
        .log_analysis_request(sensor_id, request.location(), request.point_count());

    let started = Instant::now();
    let outcome = request
        .samples()
        .and_then(|samples| state.detector.detect(&samples));

    match outcome {
        Ok(result) => {
            state
                .metrics
                .record_analysis(&result, started.elapsed().as_secs_f64());
            state.logger.log_analysis(sensor_id, &result);
            (StatusCode::OK, Json(AnalyzeResponse::from_result(&result))).into_response()
        }
        Err(err) => {
            state.metrics.record_rejection(err.kind());
            state.logger.log_rejection(sensor_id, &err);
            (error_status(&err), Json(ErrorResponse::from(&err))).into_response()
        }
    }
}

/// Health check: 200 if healthy or degraded, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy | ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check: 200 if ready, 503 otherwise
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        error!(error = %e, "Failed to encode metrics");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/status", get(status))
        .route("/analyze", post(analyze))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use thermal_lib::detector::{FeatureSet, LeakRule};

    #[test]
    fn test_self_check_passes_with_default_rules() {
        assert!(self_check(&LeakDetector::default()).is_ok());
    }

    #[test]
    fn test_self_check_catches_broken_rules() {
        fn any_cold(f: &FeatureSet) -> bool {
            f.cold_spot_count > 0
        }
        static BROKEN: [LeakRule; 1] = [LeakRule::new("any_cold", 0.5, any_cold)];

        let err = self_check(&LeakDetector::with_rules(&BROKEN)).unwrap_err();
        assert!(err.contains("single_cold_cell"));
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            error_status(&DetectionError::insufficient(1)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_status(&DetectionError::validation("bad")),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
