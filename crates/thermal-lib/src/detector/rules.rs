//! Leak classification rules
//!
//! The rules overlap, so they are kept as an ordered list and evaluated
//! top to bottom. The first rule whose condition holds decides the leak
//! probability; when none match the probability is zero.

use super::features::{FeatureSet, COLD_SPOT_THRESHOLD_C};

/// Minimum temperature (°C) below which a reading is considered severe
pub const SEVERE_MIN_TEMP_C: f64 = 16.0;

/// Gradient magnitude (°C per cell) that marks a sharp thermal edge
pub const SHARP_GRADIENT_THRESHOLD: f64 = 2.0;

/// Probability when no rule matches
pub const NO_LEAK_PROBABILITY: f64 = 0.0;

/// A single entry in the rule cascade
#[derive(Debug, Clone, Copy)]
pub struct LeakRule {
    /// Stable identifier reported alongside the result
    pub name: &'static str,
    /// Leak probability assigned when the rule matches
    pub probability: f64,
    condition: fn(&FeatureSet) -> bool,
}

impl LeakRule {
    pub const fn new(
        name: &'static str,
        probability: f64,
        condition: fn(&FeatureSet) -> bool,
    ) -> Self {
        Self {
            name,
            probability,
            condition,
        }
    }

    pub fn matches(&self, features: &FeatureSet) -> bool {
        (self.condition)(features)
    }
}

fn widespread_cold(f: &FeatureSet) -> bool {
    f.cold_spot_count > 5
}

fn cold_cluster_with_sharp_edge(f: &FeatureSet) -> bool {
    f.cold_spot_count > 3 && f.max_gradient_magnitude > SHARP_GRADIENT_THRESHOLD
}

fn severe_minimum(f: &FeatureSet) -> bool {
    f.min_temp < SEVERE_MIN_TEMP_C
}

fn cold_minimum(f: &FeatureSet) -> bool {
    f.min_temp < COLD_SPOT_THRESHOLD_C
}

fn scattered_cold(f: &FeatureSet) -> bool {
    f.cold_spot_count > 2
}

/// Rule cascade in priority order
pub const LEAK_RULES: [LeakRule; 5] = [
    LeakRule::new("widespread_cold", 0.95, widespread_cold),
    LeakRule::new("cold_cluster_sharp_gradient", 0.8, cold_cluster_with_sharp_edge),
    LeakRule::new("severe_min_temperature", 0.7, severe_minimum),
    LeakRule::new("cold_min_temperature", 0.4, cold_minimum),
    LeakRule::new("scattered_cold", 0.3, scattered_cold),
];

/// Return the first rule in `rules` that matches, if any
pub fn first_match<'a>(rules: &'a [LeakRule], features: &FeatureSet) -> Option<&'a LeakRule> {
    rules.iter().find(|rule| rule.matches(features))
}
