//! The two particle buffer generations.

use wgpu::util::DeviceExt;

use super::context::checked;
use crate::error::GpuError;
use crate::particle::{initial_particles, Particle};

const GENERATION_LABELS: [&str; 2] = ["Particle Buffer A", "Particle Buffer B"];

/// Two equally sized particle buffers, alternated every frame.
///
/// Each buffer is compute storage (read or read/write, depending on the
/// frame) and a per-instance vertex source. Neither is ever reallocated.
pub struct ParticleStore {
    buffers: [wgpu::Buffer; 2],
    count: u32,
}

impl ParticleStore {
    /// Allocate both generations and fill them with seeded random particles.
    pub fn new(device: &wgpu::Device, count: u32, seed: u64) -> Result<Self, GpuError> {
        if count == 0 || i32::try_from(count).is_err() {
            return Err(GpuError::InvalidParticleCount(count as usize));
        }
        Self::from_particles(device, &initial_particles(count, seed))
    }

    /// Allocate both generations holding copies of `particles`.
    ///
    /// Fails with [`GpuError::InvalidParticleCount`] if `particles` is empty
    /// or longer than `i32::MAX`.
    pub fn from_particles(device: &wgpu::Device, particles: &[Particle]) -> Result<Self, GpuError> {
        let count = u32::try_from(particles.len())
            .ok()
            .filter(|&n| n > 0 && i32::try_from(n).is_ok())
            .ok_or(GpuError::InvalidParticleCount(particles.len()))?;

        let contents: &[u8] = bytemuck::cast_slice(particles);
        let [label_a, label_b] = GENERATION_LABELS;
        let buffers = [
            create_generation(device, label_a, contents)?,
            create_generation(device, label_b, contents)?,
        ];

        log::debug!(
            "Allocated {} particles ({} bytes per generation)",
            count,
            contents.len()
        );

        Ok(Self { buffers, count })
    }

    /// Number of particles in each generation.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Byte size of one generation.
    pub fn size_bytes(&self) -> wgpu::BufferAddress {
        self.count as wgpu::BufferAddress * std::mem::size_of::<Particle>() as wgpu::BufferAddress
    }

    /// The buffer for generation `index` (0 or 1).
    pub fn buffer(&self, index: usize) -> &wgpu::Buffer {
        &self.buffers[index]
    }

    pub fn buffers(&self) -> &[wgpu::Buffer; 2] {
        &self.buffers
    }
}

fn create_generation(
    device: &wgpu::Device,
    label: &'static str,
    contents: &[u8],
) -> Result<wgpu::Buffer, GpuError> {
    checked(device, label, || {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage: wgpu::BufferUsages::VERTEX
                | wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::COPY_SRC
                | wgpu::BufferUsages::COPY_DST,
        })
    })
}
