//! GPU side of the simulation: buffers, pipelines and the frame loop.

mod compute;
mod context;
mod frame;
mod particle_store;
mod readback;
mod render;
mod sprite;

pub use compute::FlockingCompute;
pub use context::GpuContext;
pub use frame::{FrameCounter, FrameReport, FrameSlots};
pub use particle_store::ParticleStore;
pub use readback::read_particles;
pub use render::{BufferRole, SpriteRenderer, VertexBinding, CLEAR_COLOR, VERTEX_BINDINGS};
pub use sprite::{SpriteGeometry, SpriteVertex, SPRITE_INDICES, SPRITE_VERTICES};

use crate::error::GpuError;
use crate::particle::{Particle, SimParams};

/// The double-buffered flock and everything needed to advance and draw it.
///
/// Owns both particle generations, the sprite geometry, both pipelines and
/// the frame counter. The device and queue are borrowed per call so the same
/// type drives a window or an offscreen target.
pub struct Boids {
    store: ParticleStore,
    sprite: SpriteGeometry,
    compute: FlockingCompute,
    renderer: SpriteRenderer,
    counter: FrameCounter,
    params: SimParams,
    paused: bool,
}

impl Boids {
    /// Build a flock of `params.particle_count` seeded random particles,
    /// rendering into targets of `format`.
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        seed: u64,
        params: SimParams,
    ) -> Result<Self, GpuError> {
        let store = ParticleStore::new(device, params.count(), seed)?;
        Self::with_store(device, format, store, params)
    }

    /// Build a flock starting from an explicit snapshot.
    ///
    /// `params.particle_count` is overwritten with `particles.len()`.
    pub fn from_particles(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        particles: &[Particle],
        params: SimParams,
    ) -> Result<Self, GpuError> {
        let store = ParticleStore::from_particles(device, particles)?;
        let params = params.with_particle_count(store.count());
        Self::with_store(device, format, store, params)
    }

    fn with_store(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        store: ParticleStore,
        params: SimParams,
    ) -> Result<Self, GpuError> {
        let sprite = SpriteGeometry::new(device)?;
        let compute = FlockingCompute::new(device, &store)?;
        let renderer = SpriteRenderer::new(device, format)?;

        log::info!(
            "Flock ready: {} particles, {} workgroups per step",
            store.count(),
            crate::shader::workgroup_count(store.count())
        );

        Ok(Self {
            store,
            sprite,
            compute,
            renderer,
            counter: FrameCounter::new(),
            params,
            paused: false,
        })
    }

    /// Run one frame: dispatch compute, draw into `target` if there is one,
    /// submit.
    ///
    /// The submission happens even without a target so the freshly written
    /// generation is valid input for the next frame. While paused nothing is
    /// dispatched and the stable generation is drawn instead.
    pub fn frame(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: Option<&wgpu::TextureView>,
    ) -> FrameReport {
        let slots = self.counter.slots();
        let computed = !self.paused;

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Boids Frame Encoder"),
        });

        if computed {
            self.compute.dispatch(&mut encoder, queue, slots, &self.params);
        }

        let rendered = target.map(|view| {
            let generation = if computed { slots.dest } else { slots.source };
            self.renderer.draw(
                &mut encoder,
                view,
                self.store.buffer(generation),
                &self.sprite,
                self.store.count(),
            );
            generation
        });

        queue.submit(std::iter::once(encoder.finish()));

        if computed {
            self.counter.advance();
        }

        let report = FrameReport {
            slots,
            computed,
            rendered,
        };
        log::trace!("{:?}", report);
        report
    }

    /// Advance the simulation `frames` times without drawing.
    pub fn step(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, frames: u32) {
        for _ in 0..frames {
            self.frame(device, queue, None);
        }
    }

    /// Copy the latest completed generation back to the CPU.
    pub fn read_stable(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> Result<Vec<Particle>, GpuError> {
        read_particles(
            device,
            queue,
            self.store.buffer(self.counter.stable()),
            self.store.count(),
        )
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    /// Replace the parameters used from the next frame on.
    ///
    /// The particle count is fixed at start-up and is kept as is.
    pub fn set_params(&mut self, params: SimParams) {
        self.params = params.with_particle_count(self.store.count());
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Frames simulated so far (`t`).
    pub fn frame_count(&self) -> u64 {
        self.counter.frame()
    }

    pub fn particle_count(&self) -> u32 {
        self.store.count()
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }
}
