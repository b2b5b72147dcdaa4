//! Instanced sprite pipeline.
//!
//! Vertex input mixes two rates: the particle buffer advances once per
//! instance, the sprite triangle once per vertex. The layout is described
//! as plain data in [`VERTEX_BINDINGS`] and turned into wgpu layouts when the
//! pipeline is built.

use super::context::checked;
use super::sprite::{SpriteGeometry, SpriteVertex, SPRITE_FRONT_FACE};
use crate::error::GpuError;
use crate::particle::Particle;
use crate::shader::{FRAGMENT_ENTRY, SPRITE_SOURCE, VERTEX_ENTRY};

/// Cornflower blue.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.392,
    g: 0.584,
    b: 0.929,
    a: 1.0,
};

/// Which buffer feeds a vertex slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferRole {
    /// The generation compute just wrote.
    Particles,
    /// The static sprite triangle.
    Sprite,
}

/// One row of the vertex binding table.
#[derive(Debug, Clone, Copy)]
pub struct VertexBinding {
    pub slot: u32,
    pub role: BufferRole,
    pub step_mode: wgpu::VertexStepMode,
    pub stride: wgpu::BufferAddress,
    pub attributes: &'static [wgpu::VertexAttribute],
}

impl VertexBinding {
    pub fn layout(&self) -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride,
            step_mode: self.step_mode,
            attributes: self.attributes,
        }
    }
}

const PARTICLE_ATTRIBUTES: [wgpu::VertexAttribute; 2] = [
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x2,
        offset: std::mem::offset_of!(Particle, position) as u64,
        shader_location: 0,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x2,
        offset: std::mem::offset_of!(Particle, velocity) as u64,
        shader_location: 1,
    },
];

const SPRITE_ATTRIBUTES: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    format: wgpu::VertexFormat::Float32x2,
    offset: std::mem::offset_of!(SpriteVertex, position) as u64,
    shader_location: 2,
}];

pub const VERTEX_BINDINGS: [VertexBinding; 2] = [
    VertexBinding {
        slot: 0,
        role: BufferRole::Particles,
        step_mode: wgpu::VertexStepMode::Instance,
        stride: std::mem::size_of::<Particle>() as u64,
        attributes: &PARTICLE_ATTRIBUTES,
    },
    VertexBinding {
        slot: 1,
        role: BufferRole::Sprite,
        step_mode: wgpu::VertexStepMode::Vertex,
        stride: std::mem::size_of::<SpriteVertex>() as u64,
        attributes: &SPRITE_ATTRIBUTES,
    },
];

/// Render pipeline drawing one sprite per particle.
pub struct SpriteRenderer {
    pipeline: wgpu::RenderPipeline,
}

impl SpriteRenderer {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Result<Self, GpuError> {
        let shader = checked(device, "Sprite Shader", || {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Sprite Shader"),
                source: wgpu::ShaderSource::Wgsl(SPRITE_SOURCE.into()),
            })
        })?;

        let pipeline_layout = checked(device, "Sprite Pipeline Layout", || {
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Sprite Pipeline Layout"),
                bind_group_layouts: &[],
                push_constant_ranges: &[],
            })
        })?;

        let buffers = VERTEX_BINDINGS.map(|binding| binding.layout());

        let pipeline = checked(device, "Sprite Pipeline", || {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Sprite Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some(VERTEX_ENTRY),
                    buffers: &buffers,
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(FRAGMENT_ENTRY),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: SPRITE_FRONT_FACE,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        })?;

        Ok(Self { pipeline })
    }

    /// Record a render pass that clears `target` and draws `instance_count`
    /// sprites positioned by `instances`.
    pub fn draw(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        instances: &wgpu::Buffer,
        sprite: &SpriteGeometry,
        instance_count: u32,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Sprite Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(&self.pipeline);
        for binding in &VERTEX_BINDINGS {
            let buffer = match binding.role {
                BufferRole::Particles => instances,
                BufferRole::Sprite => &sprite.vertex_buffer,
            };
            render_pass.set_vertex_buffer(binding.slot, buffer.slice(..));
        }
        render_pass.set_index_buffer(sprite.index_buffer.slice(..), SpriteGeometry::INDEX_FORMAT);
        render_pass.draw_indexed(0..SpriteGeometry::INDEX_COUNT, 0, 0..instance_count);
    }
}
