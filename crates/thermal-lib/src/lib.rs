//! Thermal leak detection library
//!
//! This crate provides the core functionality for:
//! - Validating 8x8 thermal sensor frames
//! - Rule-based water leak detection
//! - Request/response payloads for the analysis service
//! - Synthetic frame generation for testing
//! - Health checks and observability

pub mod detector;
pub mod error;
pub mod grid;
pub mod health;
pub mod models;
pub mod observability;
pub mod synthetic;

pub use detector::{detect, DetectionResult, FeatureSet, LeakDetector, RiskLevel};
pub use error::DetectionError;
pub use grid::{ThermalGrid, GRID_CELLS, GRID_SIZE};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{ServiceMetrics, StructuredLogger};
