//! The triangle drawn for every particle.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use wgpu::util::DeviceExt;

use super::context::checked;
use crate::error::GpuError;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub position: Vec2,
}

/// Small upward-pointing triangle centred on the origin.
pub const SPRITE_VERTICES: [SpriteVertex; 3] = [
    SpriteVertex { position: Vec2::new(-0.01, -0.02) },
    SpriteVertex { position: Vec2::new(0.01, -0.02) },
    SpriteVertex { position: Vec2::new(0.0, 0.02) },
];

pub const SPRITE_INDICES: [u16; 3] = [0, 1, 2];

/// Winding of [`SPRITE_VERTICES`] in `SPRITE_INDICES` order.
pub const SPRITE_FRONT_FACE: wgpu::FrontFace = wgpu::FrontFace::Ccw;

/// Immutable vertex and index buffers for the sprite.
pub struct SpriteGeometry {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
}

impl SpriteGeometry {
    pub const INDEX_FORMAT: wgpu::IndexFormat = wgpu::IndexFormat::Uint16;
    pub const INDEX_COUNT: u32 = SPRITE_INDICES.len() as u32;

    pub fn new(device: &wgpu::Device) -> Result<Self, GpuError> {
        let vertex_buffer = checked(device, "Sprite Vertex Buffer", || {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Sprite Vertex Buffer"),
                contents: bytemuck::cast_slice(&SPRITE_VERTICES),
                usage: wgpu::BufferUsages::VERTEX,
            })
        })?;

        let index_buffer = checked(device, "Sprite Index Buffer", || {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Sprite Index Buffer"),
                contents: bytemuck::cast_slice(&SPRITE_INDICES),
                usage: wgpu::BufferUsages::INDEX,
            })
        })?;

        Ok(Self {
            vertex_buffer,
            index_buffer,
        })
    }
}
