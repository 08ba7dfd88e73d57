//! Synthetic thermal frames
//!
//! Produces realistic-looking sensor frames for exercising the server
//! end to end, plus deterministic grids for tests.

use crate::grid::{GRID_CELLS, GRID_SIZE};
use rand::Rng;

/// Centre of the sensor frame in grid coordinates
const FRAME_CENTRE: f64 = (GRID_SIZE as f64 - 1.0) / 2.0;

/// First row and column of the simulated leak block
pub const LEAK_BLOCK_START: usize = 3;

/// Side length of the simulated leak block
pub const LEAK_BLOCK_SIZE: usize = 3;

/// Lowest temperature a leak cell can reach
pub const LEAK_FLOOR_C: f64 = 16.0;

/// Highest temperature a leak cell can keep; always below the cold spot threshold
pub const LEAK_CEILING_C: f64 = 17.5;

/// Random generator for sensor-like frames
#[derive(Debug, Clone)]
pub struct SyntheticGenerator {
    /// Temperature at the centre of the frame (°C)
    pub base_temp: f64,
    /// Temperature lost per cell of distance from the centre
    pub radial_falloff: f64,
    /// Half-width of the uniform noise added to each cell
    pub noise: f64,
    /// Chance (0.0-1.0) that a frame contains a simulated leak
    pub leak_chance: f64,
}

/// A generated frame and whether a leak was injected into it
#[derive(Debug, Clone)]
pub struct SyntheticFrame {
    pub samples: Vec<f64>,
    pub leak_injected: bool,
}

impl SyntheticFrame {
    pub fn min_temp(&self) -> f64 {
        self.samples.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max_temp(&self) -> f64 {
        self.samples.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

impl Default for SyntheticGenerator {
    fn default() -> Self {
        Self {
            base_temp: 25.0,
            radial_falloff: 0.3,
            noise: 1.0,
            leak_chance: 0.25,
        }
    }
}

impl SyntheticGenerator {
    pub fn with_leak_chance(mut self, leak_chance: f64) -> Self {
        self.leak_chance = leak_chance.clamp(0.0, 1.0);
        self
    }

    /// Generate one frame
    pub fn generate<R: Rng>(&self, rng: &mut R) -> SyntheticFrame {
        let mut samples = self.background(rng);
        let leak_injected = rng.gen::<f64>() < self.leak_chance;
        if leak_injected {
            inject_leak(&mut samples, rng);
        }
        SyntheticFrame {
            samples,
            leak_injected,
        }
    }

    /// Frame without any leak: warm centre cooling towards the edges
    pub fn background<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        let mut samples = Vec::with_capacity(GRID_CELLS);
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                let distance = ((row as f64 - FRAME_CENTRE).powi(2)
                    + (col as f64 - FRAME_CENTRE).powi(2))
                .sqrt();
                let jitter = if self.noise > 0.0 {
                    rng.gen_range(-self.noise..=self.noise)
                } else {
                    0.0
                };
                samples.push(round2(self.base_temp - distance * self.radial_falloff + jitter));
            }
        }
        samples
    }
}

/// Cool the leak block so every cell in it becomes a cold spot
pub fn inject_leak<R: Rng>(samples: &mut [f64], rng: &mut R) {
    for row in LEAK_BLOCK_START..LEAK_BLOCK_START + LEAK_BLOCK_SIZE {
        for col in LEAK_BLOCK_START..LEAK_BLOCK_START + LEAK_BLOCK_SIZE {
            let idx = row * GRID_SIZE + col;
            let drop = rng.gen_range(6.0..=9.0);
            samples[idx] = round2((samples[idx] - drop).clamp(LEAK_FLOOR_C, LEAK_CEILING_C));
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 64 identical readings
pub fn uniform_grid(temp: f64) -> Vec<f64> {
    vec![temp; GRID_CELLS]
}

/// Uniform grid with a single cell overridden
pub fn grid_with_cell(base: f64, row: usize, col: usize, temp: f64) -> Vec<f64> {
    let mut samples = uniform_grid(base);
    samples[row * GRID_SIZE + col] = temp;
    samples
}

/// Uniform grid with a `rows` x `cols` block starting at (`row`, `col`) set to `cold`
pub fn grid_with_cold_block(
    base: f64,
    cold: f64,
    row: usize,
    col: usize,
    rows: usize,
    cols: usize,
) -> Vec<f64> {
    let mut samples = uniform_grid(base);
    for r in row..(row + rows).min(GRID_SIZE) {
        for c in col..(col + cols).min(GRID_SIZE) {
            samples[r * GRID_SIZE + c] = cold;
        }
    }
    samples
}

/// The canonical leak frame: warm background with the leak block below 18 °C
pub fn leak_grid(base: f64, cold: f64) -> Vec<f64> {
    grid_with_cold_block(
        base,
        cold,
        LEAK_BLOCK_START,
        LEAK_BLOCK_START,
        LEAK_BLOCK_SIZE,
        LEAK_BLOCK_SIZE,
    )
}
