//! Water leak detection from thermal frames
//!
//! Turns a flattened 8x8 thermal frame into a leak probability by extracting
//! grid features and running them through the ordered rule cascade.

use super::features::FeatureSet;
use super::rules::{first_match, LeakRule, LEAK_RULES, NO_LEAK_PROBABILITY};
use crate::error::DetectionError;
use crate::grid::ThermalGrid;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Probability above which a frame is high risk
const HIGH_RISK_ABOVE: f64 = 0.7;

/// Probability above which a frame is medium risk
const MEDIUM_RISK_ABOVE: f64 = 0.4;

/// Risk tier derived from the leak probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Thresholds are strict: 0.7 is medium and 0.4 is low
    pub fn from_probability(probability: f64) -> Self {
        if probability > HIGH_RISK_ABOVE {
            RiskLevel::High
        } else if probability > MEDIUM_RISK_ABOVE {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of analysing one thermal frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub leak_probability: f64,
    pub risk_level: RiskLevel,
    pub features: FeatureSet,
    /// Name of the rule that fired, `None` when no rule matched
    pub matched_rule: Option<String>,
}

/// Rule-based leak detector
///
/// Holds no mutable state; a single instance can be shared across threads.
#[derive(Debug, Clone, Copy)]
pub struct LeakDetector {
    rules: &'static [LeakRule],
}

impl LeakDetector {
    pub fn new() -> Self {
        Self { rules: &LEAK_RULES }
    }

    /// Use a custom rule cascade
    pub fn with_rules(rules: &'static [LeakRule]) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'static [LeakRule] {
        self.rules
    }

    /// Analyse a flattened row-major frame.
    ///
    /// # Errors
    /// * `InsufficientData` if fewer than 64 samples are supplied
    /// * `Validation` if any of the first 64 samples is not finite
    pub fn detect(&self, samples: &[f64]) -> Result<DetectionResult, DetectionError> {
        let grid = ThermalGrid::from_samples(samples)?;
        Ok(self.classify(&grid))
    }

    /// Classify an already validated grid
    pub fn classify(&self, grid: &ThermalGrid) -> DetectionResult {
        let features = FeatureSet::extract(grid);
        let matched = first_match(self.rules, &features);
        let leak_probability = matched
            .map(|rule| rule.probability)
            .unwrap_or(NO_LEAK_PROBABILITY);

        DetectionResult {
            leak_probability,
            risk_level: RiskLevel::from_probability(leak_probability),
            features,
            matched_rule: matched.map(|rule| rule.name.to_string()),
        }
    }
}

impl Default for LeakDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Analyse a frame with the default rule cascade
pub fn detect(samples: &[f64]) -> Result<DetectionResult, DetectionError> {
    LeakDetector::default().detect(samples)
}
