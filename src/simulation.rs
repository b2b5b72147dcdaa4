//! Simulation builder and runner

use winit::event_loop::{ControlFlow, EventLoop};

use crate::config::BoidsConfig;
use crate::error::SimulationError;
use crate::particle::SimParams;
use crate::window::App;

/// A flocking simulation builder.
///
/// Use method chaining to configure, then call `.run()` to open a window and
/// simulate until it is closed.
#[derive(Debug, Clone, Default)]
pub struct Simulation {
    config: BoidsConfig,
}

impl Simulation {
    /// Create a new simulation with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn from_config(config: BoidsConfig) -> Self {
        Self { config }
    }

    /// Set the number of particles.
    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.config.particle_count = count;
        self
    }

    /// Set the seed for the initial particle state.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Set the flocking parameters. The particle count inside `params` is
    /// ignored; use [`with_particle_count`](Self::with_particle_count).
    pub fn with_params(mut self, params: SimParams) -> Self {
        self.config.params = params;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    /// Set the initial window size in logical pixels.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    pub fn with_present_mode(mut self, present_mode: wgpu::PresentMode) -> Self {
        self.config.present_mode = present_mode;
        self
    }

    /// Cap the frame rate. `None` leaves pacing to the present mode.
    pub fn with_target_fps(mut self, fps: Option<u32>) -> Self {
        self.config.target_fps = fps;
        self
    }

    pub fn config(&self) -> &BoidsConfig {
        &self.config
    }

    /// Run the simulation. This blocks until the window is closed.
    pub fn run(self) -> Result<(), SimulationError> {
        self.config.validate()?;
        log::info!(
            "Starting {} particles (seed {})",
            self.config.particle_count,
            self.config.seed
        );

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = App::new(self.config);
        event_loop.run_app(&mut app)?;
        app.into_result()
    }
}
