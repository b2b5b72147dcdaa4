//! Copying particle buffers back to the CPU.

use std::sync::mpsc;

use crate::error::GpuError;
use crate::particle::Particle;

/// Read the first `count` particles of `buffer`.
///
/// Submits its own copy and blocks until the GPU has finished all work
/// submitted before it, so the result reflects every earlier frame.
pub fn read_particles(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    buffer: &wgpu::Buffer,
    count: u32,
) -> Result<Vec<Particle>, GpuError> {
    let size = count as wgpu::BufferAddress * std::mem::size_of::<Particle>() as wgpu::BufferAddress;
    if size == 0 {
        return Ok(Vec::new());
    }

    let staging = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Particle Readback Buffer"),
        size,
        usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Particle Readback Encoder"),
    });
    encoder.copy_buffer_to_buffer(buffer, 0, &staging, 0, size);
    queue.submit(std::iter::once(encoder.finish()));

    let buffer_slice = staging.slice(..);
    let (sender, receiver) = mpsc::channel();
    buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = sender.send(result);
    });
    device.poll(wgpu::Maintain::Wait);

    receiver
        .recv()
        .map_err(|e| GpuError::BufferMapping(e.to_string()))?
        .map_err(|e| GpuError::BufferMapping(e.to_string()))?;

    let particles = {
        let data = buffer_slice.get_mapped_range();
        bytemuck::cast_slice::<u8, Particle>(&data).to_vec()
    };
    staging.unmap();

    Ok(particles)
}
