//! Start-up configuration.

use crate::error::SimulationError;
use crate::particle::{SimParams, NUM_PARTICLES};

/// Seed used when none is supplied.
pub const DEFAULT_SEED: u64 = 0x5eed_b01d;

/// Everything fixed at start-up: population, seed, window and pacing.
///
/// `params.particle_count` is kept in sync with `particle_count` by
/// [`BoidsConfig::sim_params`]; set the population through `particle_count`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoidsConfig {
    pub particle_count: u32,
    pub seed: u64,
    pub params: SimParams,
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub present_mode: wgpu::PresentMode,
    /// Frame rate cap. `None` draws as fast as the present mode allows.
    pub target_fps: Option<u32>,
}

impl Default for BoidsConfig {
    fn default() -> Self {
        Self {
            particle_count: NUM_PARTICLES,
            seed: DEFAULT_SEED,
            params: SimParams::default(),
            title: "Boids".to_string(),
            width: 640,
            height: 480,
            present_mode: wgpu::PresentMode::Fifo,
            target_fps: Some(60),
        }
    }
}

impl BoidsConfig {
    /// Check that the configuration describes a runnable simulation.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.particle_count == 0 {
            return Err(SimulationError::Config("particle count must be at least 1".into()));
        }
        if i32::try_from(self.particle_count).is_err() {
            return Err(SimulationError::Config(format!(
                "particle count {} exceeds {}",
                self.particle_count,
                i32::MAX
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(SimulationError::Config(format!(
                "window size {}x{} must be non-zero",
                self.width, self.height
            )));
        }
        if self.target_fps == Some(0) {
            return Err(SimulationError::Config("target fps must be positive".into()));
        }
        if !(self.params.delta_t.is_finite() && self.params.delta_t >= 0.0) {
            return Err(SimulationError::Config(format!(
                "delta_t {} must be finite and non-negative",
                self.params.delta_t
            )));
        }
        Ok(())
    }

    /// Per-dispatch parameters with the particle count filled in.
    ///
    /// Call [`validate`](Self::validate) first.
    pub fn sim_params(&self) -> SimParams {
        self.params.with_particle_count(self.particle_count)
    }
}
