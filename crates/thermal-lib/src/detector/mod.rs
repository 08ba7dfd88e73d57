//! Thermal leak detection
//!
//! This module provides:
//! - Feature extraction (temperature statistics, cold spots, spatial gradient)
//! - An ordered rule cascade mapping features to a leak probability
//! - The `LeakDetector` tying both together

mod features;
mod leak_detector;
mod rules;

pub use features::{gradient_at, max_gradient_magnitude, FeatureSet, COLD_SPOT_THRESHOLD_C};
pub use leak_detector::{detect, DetectionResult, LeakDetector, RiskLevel};
pub use rules::{
    first_match, LeakRule, LEAK_RULES, NO_LEAK_PROBABILITY, SEVERE_MIN_TEMP_C,
    SHARP_GRADIENT_THRESHOLD,
};
