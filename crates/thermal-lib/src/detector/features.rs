//! Feature extraction from a thermal grid
//!
//! Computes the summary statistics, cold spot count and peak spatial
//! gradient that feed the leak rule cascade.

use crate::grid::{ThermalGrid, GRID_CELLS, GRID_SIZE};
use serde::{Deserialize, Serialize};

/// Cells strictly below this temperature (°C) count as cold spots
pub const COLD_SPOT_THRESHOLD_C: f64 = 18.0;

/// Features derived from a single grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    pub min_temp: f64,
    pub max_temp: f64,
    pub avg_temp: f64,
    pub cold_spot_count: usize,
    pub max_gradient_magnitude: f64,
}

impl FeatureSet {
    pub fn extract(grid: &ThermalGrid) -> Self {
        let mut min_temp = f64::INFINITY;
        let mut max_temp = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut cold_spot_count = 0;

        for value in grid.iter() {
            min_temp = min_temp.min(value);
            max_temp = max_temp.max(value);
            sum += value;
            if value < COLD_SPOT_THRESHOLD_C {
                cold_spot_count += 1;
            }
        }

        Self {
            min_temp,
            max_temp,
            avg_temp: sum / GRID_CELLS as f64,
            cold_spot_count,
            max_gradient_magnitude: max_gradient_magnitude(grid),
        }
    }
}

/// Discrete derivative of `values` at position `k` with unit spacing.
///
/// Interior points use the central difference; the first and last points
/// fall back to one-sided first differences.
fn axis_gradient(values: impl Fn(usize) -> f64, k: usize) -> f64 {
    let last = GRID_SIZE - 1;
    if k == 0 {
        values(1) - values(0)
    } else if k == last {
        values(last) - values(last - 1)
    } else {
        (values(k + 1) - values(k - 1)) / 2.0
    }
}

/// Gradient vector `(d/drow, d/dcol)` at a cell
pub fn gradient_at(grid: &ThermalGrid, row: usize, col: usize) -> (f64, f64) {
    let g_row = axis_gradient(|r| grid.get(r, col), row);
    let g_col = axis_gradient(|c| grid.get(row, c), col);
    (g_row, g_col)
}

/// Largest Euclidean gradient norm over all cells
pub fn max_gradient_magnitude(grid: &ThermalGrid) -> f64 {
    let mut max = 0.0_f64;
    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            let (g_row, g_col) = gradient_at(grid, row, col);
            max = max.max((g_row * g_row + g_col * g_col).sqrt());
        }
    }
    max
}
