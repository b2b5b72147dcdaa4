//! Particle and simulation parameter layouts.
//!
//! Both structs are uploaded to the GPU byte-for-byte, so their field order and
//! sizes must match the `Particle` and `SimParams` structs in `compute.wgsl`.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Default population size.
pub const NUM_PARTICLES: u32 = 1500;

/// Velocity magnitude cap applied after the flocking rules.
pub const MAX_SPEED: f32 = 0.1;

/// One boid: where it is and where it is heading.
///
/// The same record is a storage-buffer element for the compute kernel and a
/// per-instance vertex for the sprite renderer.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
}

const _: () = assert!(std::mem::size_of::<Particle>() == 16);
const _: () = assert!(std::mem::offset_of!(Particle, position) == 0);
const _: () = assert!(std::mem::offset_of!(Particle, velocity) == 8);

impl Particle {
    pub const fn new(position: Vec2, velocity: Vec2) -> Self {
        Self { position, velocity }
    }

    /// A particle at rest.
    pub const fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
        }
    }
}

/// Scalar inputs of one compute dispatch.
///
/// Distances are radii in normalized device units; scales weight each rule's
/// contribution to the new velocity.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SimParams {
    pub delta_t: f32,
    /// Cohesion radius.
    pub rule1_distance: f32,
    /// Separation radius.
    pub rule2_distance: f32,
    /// Alignment radius.
    pub rule3_distance: f32,
    pub rule1_scale: f32,
    pub rule2_scale: f32,
    pub rule3_scale: f32,
    pub particle_count: i32,
}

const _: () = assert!(std::mem::size_of::<SimParams>() == 32);
const _: () = assert!(std::mem::offset_of!(SimParams, delta_t) == 0);
const _: () = assert!(std::mem::offset_of!(SimParams, rule3_scale) == 24);
const _: () = assert!(std::mem::offset_of!(SimParams, particle_count) == 28);

impl SimParams {
    /// Returns a copy with `particle_count` set.
    ///
    /// # Panics
    ///
    /// Panics if `count` does not fit the kernel's `i32` counter.
    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.particle_count =
            i32::try_from(count).expect("particle count must fit in an i32");
        self
    }

    /// Number of particles the kernel will process.
    pub fn count(&self) -> u32 {
        self.particle_count.max(0) as u32
    }
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            delta_t: 0.04,
            rule1_distance: 0.1,
            rule2_distance: 0.025,
            rule3_distance: 0.025,
            rule1_scale: 0.02,
            rule2_scale: 0.05,
            rule3_scale: 0.005,
            particle_count: NUM_PARTICLES as i32,
        }
    }
}

/// Generate the randomized starting population.
///
/// Positions are uniform in `[-1, 1]²`; velocities are a `[-1, 1]²` draw
/// scaled by `0.1`. The same `seed` always yields the same particles.
pub fn initial_particles(count: u32, seed: u64) -> Vec<Particle> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let position = Vec2::new(rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0));
            let velocity = Vec2::new(rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0)) * 0.1;
            Particle::new(position, velocity)
        })
        .collect()
}
