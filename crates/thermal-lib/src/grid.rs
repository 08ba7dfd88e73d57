//! Fixed-size thermal sensor grid
//!
//! The sensor reports an 8x8 frame flattened row-major. Index `i * 8 + j`
//! maps to row `i`, column `j`.

use crate::error::DetectionError;

/// Rows (and columns) in a sensor frame
pub const GRID_SIZE: usize = 8;

/// Number of cells in a sensor frame
pub const GRID_CELLS: usize = GRID_SIZE * GRID_SIZE;

/// An 8x8 matrix of temperatures in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalGrid {
    cells: [[f64; GRID_SIZE]; GRID_SIZE],
}

impl ThermalGrid {
    /// Build a grid from a flat row-major slice.
    ///
    /// Only the first 64 values are used; anything after them is ignored.
    pub fn from_samples(samples: &[f64]) -> Result<Self, DetectionError> {
        if samples.len() < GRID_CELLS {
            return Err(DetectionError::insufficient(samples.len()));
        }

        let mut cells = [[0.0; GRID_SIZE]; GRID_SIZE];
        for (idx, value) in samples.iter().take(GRID_CELLS).enumerate() {
            if !value.is_finite() {
                return Err(DetectionError::validation(format!(
                    "thermal_data[{}] is not a finite temperature ({})",
                    idx, value
                )));
            }
            cells[idx / GRID_SIZE][idx % GRID_SIZE] = *value;
        }

        Ok(Self { cells })
    }

    /// Temperature at row `row`, column `col`
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.cells[row][col]
    }

    pub fn rows(&self) -> &[[f64; GRID_SIZE]; GRID_SIZE] {
        &self.cells
    }

    /// Iterate all cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.cells.iter().flat_map(|row| row.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> Vec<f64> {
        (0..len).map(|i| i as f64).collect()
    }

    #[test]
    fn test_row_major_layout() {
        let grid = ThermalGrid::from_samples(&ramp(64)).unwrap();
        assert_eq!(grid.get(0, 0), 0.0);
        assert_eq!(grid.get(0, 7), 7.0);
        assert_eq!(grid.get(1, 0), 8.0);
        assert_eq!(grid.get(7, 7), 63.0);
    }

    #[test]
    fn test_too_few_samples() {
        let err = ThermalGrid::from_samples(&ramp(10)).unwrap_err();
        assert_eq!(
            err,
            DetectionError::InsufficientData {
                received: 10,
                required: 64
            }
        );
    }

    #[test]
    fn test_empty_input() {
        let err = ThermalGrid::from_samples(&[]).unwrap_err();
        assert_eq!(err.kind(), "insufficient_data");
    }

    #[test]
    fn test_extra_samples_ignored() {
        let long = ThermalGrid::from_samples(&ramp(70)).unwrap();
        let exact = ThermalGrid::from_samples(&ramp(64)).unwrap();
        assert_eq!(long, exact);
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut samples = vec![25.0; 64];
        samples[12] = f64::NAN;
        let err = ThermalGrid::from_samples(&samples).unwrap_err();
        assert!(matches!(err, DetectionError::Validation(ref msg) if msg.contains("[12]")));
    }

    #[test]
    fn test_non_finite_beyond_prefix_ignored() {
        let mut samples = vec![25.0; 66];
        samples[65] = f64::INFINITY;
        assert!(ThermalGrid::from_samples(&samples).is_ok());
    }
}
