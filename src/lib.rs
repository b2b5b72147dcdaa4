//! # Boids
//!
//! A GPU-resident flocking simulation built on wgpu.
//!
//! A fixed population of particles lives in two GPU buffers. Every frame a
//! compute kernel reads one buffer, applies cohesion, separation and
//! alignment against every other particle, and writes the result into the
//! other buffer. The render pass then draws a small triangle per particle,
//! reading the buffer that was just written as per-instance vertex data.
//!
//! ## Quick Start
//!
//! ```ignore
//! use boids::prelude::*;
//!
//! fn main() -> Result<(), SimulationError> {
//!     Simulation::new()
//!         .with_particle_count(1500)
//!         .with_seed(42)
//!         .run()
//! }
//! ```
//!
//! ## Frame model
//!
//! Frame `t` reads generation `t % 2` and writes generation `(t + 1) % 2`.
//! Compute and render are recorded into one command encoder and submitted
//! together, so the render pass always sees the completed compute output.
//! If no swapchain image is available the draw is skipped but the compute
//! step is still submitted.
//!
//! ## Headless use
//!
//! ```ignore
//! use boids::prelude::*;
//!
//! let gpu = GpuContext::headless()?;
//! let mut boids = Boids::new(&gpu.device, wgpu::TextureFormat::Rgba8Unorm, 7, SimParams::default())?;
//! boids.step(&gpu.device, &gpu.queue, 10);
//! let particles = boids.read_stable(&gpu.device, &gpu.queue)?;
//! ```

pub mod config;
pub mod error;
pub mod gpu;
pub mod particle;
pub mod reference;
pub mod shader;
mod simulation;
pub mod time;
mod window;

pub use bytemuck;
pub use config::BoidsConfig;
pub use error::{GpuError, SimulationError};
pub use glam::Vec2;
pub use gpu::{Boids, GpuContext};
pub use particle::{Particle, SimParams, MAX_SPEED, NUM_PARTICLES};
pub use simulation::Simulation;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use boids::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::BoidsConfig;
    pub use crate::error::{GpuError, SimulationError};
    pub use crate::gpu::{Boids, FrameReport, GpuContext};
    pub use crate::particle::{Particle, SimParams};
    pub use crate::simulation::Simulation;
    pub use glam::Vec2;
}
