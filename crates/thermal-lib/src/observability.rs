//! Observability for the analysis service
//!
//! Provides:
//! - Prometheus metrics (analysis latency, outcomes by risk level, rejections)
//! - Structured JSON logging with tracing

use crate::detector::DetectionResult;
use crate::error::DetectionError;
use prometheus::{
    register_gauge, register_histogram, register_int_counter_vec, register_int_gauge, Gauge,
    Histogram, IntCounterVec, IntGauge,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Histogram buckets for analysis latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.000_005, 0.00001, 0.000_025, 0.00005, 0.0001, 0.00025, 0.0005, 0.001, 0.005, 0.01,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<ServiceMetricsInner> = OnceLock::new();

struct ServiceMetricsInner {
    analysis_latency_seconds: Histogram,
    analyses_total: IntCounterVec,
    analysis_rejections_total: IntCounterVec,
    last_leak_probability: Gauge,
    last_cold_spots: IntGauge,
}

impl ServiceMetricsInner {
    fn new() -> Self {
        Self {
            analysis_latency_seconds: register_histogram!(
                "thermal_server_analysis_latency_seconds",
                "Time spent running leak detection on a frame",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register analysis_latency_seconds"),

            analyses_total: register_int_counter_vec!(
                "thermal_server_analyses_total",
                "Frames analysed, by resulting risk level",
                &["risk_level"]
            )
            .expect("Failed to register analyses_total"),

            analysis_rejections_total: register_int_counter_vec!(
                "thermal_server_analysis_rejections_total",
                "Requests rejected before detection, by error kind",
                &["kind"]
            )
            .expect("Failed to register analysis_rejections_total"),

            last_leak_probability: register_gauge!(
                "thermal_server_last_leak_probability",
                "Leak probability of the most recent frame"
            )
            .expect("Failed to register last_leak_probability"),

            last_cold_spots: register_int_gauge!(
                "thermal_server_last_cold_spots",
                "Cold spot count of the most recent frame"
            )
            .expect("Failed to register last_cold_spots"),
        }
    }
}

/// Service metrics for Prometheus exposition
///
/// Lightweight handle to the global metrics instance; clones share the same
/// underlying metrics.
#[derive(Clone)]
pub struct ServiceMetrics {
    _private: (),
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(ServiceMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &ServiceMetricsInner {
        GLOBAL_METRICS.get_or_init(ServiceMetricsInner::new)
    }

    /// Record a completed analysis
    pub fn record_analysis(&self, result: &DetectionResult, duration_secs: f64) {
        let inner = self.inner();
        inner.analysis_latency_seconds.observe(duration_secs);
        inner
            .analyses_total
            .with_label_values(&[result.risk_level.as_str()])
            .inc();
        inner.last_leak_probability.set(result.leak_probability);
        inner
            .last_cold_spots
            .set(result.features.cold_spot_count as i64);
    }

    /// Record a request rejected with a detection error
    pub fn record_rejection(&self, kind: &str) {
        self.inner()
            .analysis_rejections_total
            .with_label_values(&[kind])
            .inc();
    }
}

/// Structured logger for service events
#[derive(Clone)]
pub struct StructuredLogger {
    service: String,
}

impl StructuredLogger {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn log_startup(&self, version: &str, addr: &str) {
        info!(
            event = "service_started",
            service = %self.service,
            version = %version,
            addr = %addr,
            endpoints = "/, /status, /analyze",
            "Thermal analysis server ready"
        );
    }

    pub fn log_analysis_request(&self, sensor_id: &str, location: &str, points: usize) {
        info!(
            event = "analysis_requested",
            service = %self.service,
            sensor_id = %sensor_id,
            location = %location,
            points = points,
            "Received thermal data"
        );
    }

    /// Log a completed analysis; likely leaks are logged at warn level
    pub fn log_analysis(&self, sensor_id: &str, result: &DetectionResult) {
        let matched_rule = result.matched_rule.as_deref().unwrap_or("none");
        if result.leak_probability > 0.7 {
            warn!(
                event = "analysis_completed",
                service = %self.service,
                sensor_id = %sensor_id,
                leak_probability = result.leak_probability,
                risk_level = %result.risk_level,
                cold_spots = result.features.cold_spot_count,
                min_temperature = result.features.min_temp,
                max_gradient = result.features.max_gradient_magnitude,
                matched_rule = %matched_rule,
                "Probable water leak detected"
            );
        } else {
            info!(
                event = "analysis_completed",
                service = %self.service,
                sensor_id = %sensor_id,
                leak_probability = result.leak_probability,
                risk_level = %result.risk_level,
                cold_spots = result.features.cold_spot_count,
                min_temperature = result.features.min_temp,
                max_gradient = result.features.max_gradient_magnitude,
                matched_rule = %matched_rule,
                "Analysis complete"
            );
        }
    }

    pub fn log_rejection(&self, sensor_id: &str, error: &DetectionError) {
        warn!(
            event = "analysis_rejected",
            service = %self.service,
            sensor_id = %sensor_id,
            kind = error.kind(),
            error = %error,
            "Analysis rejected"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            service = %self.service,
            reason = %reason,
            "Thermal analysis server shutting down"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::detect;
    use crate::synthetic::{leak_grid, uniform_grid};

    #[test]
    fn test_metrics_record() {
        let metrics = ServiceMetrics::new();
        let calm = detect(&uniform_grid(25.0)).unwrap();
        let leak = detect(&leak_grid(25.0, 16.5)).unwrap();

        metrics.record_analysis(&calm, 0.00002);
        metrics.record_analysis(&leak, 0.00003);
        metrics.record_rejection("insufficient_data");

        let inner = metrics.inner();
        assert!(inner.analyses_total.with_label_values(&["high"]).get() >= 1);
        assert!(inner.analyses_total.with_label_values(&["low"]).get() >= 1);
        assert!(
            inner
                .analysis_rejections_total
                .with_label_values(&["insufficient_data"])
                .get()
                >= 1
        );
    }

    #[test]
    fn test_metrics_handles_share_registry() {
        // A second handle must not try to register the metrics again
        let _a = ServiceMetrics::new();
        let _b = ServiceMetrics::new();
    }

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("Thermal AI");
        assert_eq!(logger.service, "Thermal AI");
    }
}
