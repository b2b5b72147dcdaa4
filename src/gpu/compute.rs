//! Flocking compute pipeline and its per-frame dispatch.

use super::context::checked;
use super::frame::FrameSlots;
use super::particle_store::ParticleStore;
use crate::error::GpuError;
use crate::particle::{Particle, SimParams};
use crate::shader::{workgroup_count, COMPUTE_ENTRY, COMPUTE_SOURCE};

const PARAMS_BINDING: u32 = 0;
const SOURCE_BINDING: u32 = 1;
const DEST_BINDING: u32 = 2;

/// The compute pipeline plus one bind group per frame parity.
///
/// `bind_groups[g]` reads generation `g` and writes generation `1 - g`.
pub struct FlockingCompute {
    pipeline: wgpu::ComputePipeline,
    params_buffer: wgpu::Buffer,
    bind_groups: [wgpu::BindGroup; 2],
    particle_count: u32,
}

impl FlockingCompute {
    pub fn new(device: &wgpu::Device, store: &ParticleStore) -> Result<Self, GpuError> {
        let params_size = std::mem::size_of::<SimParams>() as wgpu::BufferAddress;
        let particle_size = std::mem::size_of::<Particle>() as wgpu::BufferAddress;

        let params_buffer = checked(device, "Sim Params Buffer", || {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Sim Params Buffer"),
                size: params_size,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        })?;

        let bind_group_layout = checked(device, "Flocking Bind Group Layout", || {
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Flocking Bind Group Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: PARAMS_BINDING,
                        visibility: wgpu::ShaderStages::COMPUTE,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: wgpu::BufferSize::new(params_size),
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: SOURCE_BINDING,
                        visibility: wgpu::ShaderStages::COMPUTE,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Storage { read_only: true },
                            has_dynamic_offset: false,
                            min_binding_size: wgpu::BufferSize::new(particle_size),
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: DEST_BINDING,
                        visibility: wgpu::ShaderStages::COMPUTE,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Storage { read_only: false },
                            has_dynamic_offset: false,
                            min_binding_size: wgpu::BufferSize::new(particle_size),
                        },
                        count: None,
                    },
                ],
            })
        })?;

        let bind_group = |source: usize, label: &str| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: PARAMS_BINDING,
                        resource: params_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: SOURCE_BINDING,
                        resource: store.buffer(source).as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: DEST_BINDING,
                        resource: store.buffer(1 - source).as_entire_binding(),
                    },
                ],
            })
        };
        let bind_groups = checked(device, "Flocking Bind Groups", || {
            [
                bind_group(0, "Flocking Bind Group A->B"),
                bind_group(1, "Flocking Bind Group B->A"),
            ]
        })?;

        let shader = checked(device, "Flocking Shader", || {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Flocking Shader"),
                source: wgpu::ShaderSource::Wgsl(COMPUTE_SOURCE.into()),
            })
        })?;

        let pipeline_layout = checked(device, "Flocking Pipeline Layout", || {
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Flocking Pipeline Layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            })
        })?;

        let pipeline = checked(device, "Flocking Pipeline", || {
            device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some("Flocking Pipeline"),
                layout: Some(&pipeline_layout),
                module: &shader,
                entry_point: Some(COMPUTE_ENTRY),
                compilation_options: Default::default(),
                cache: None,
            })
        })?;

        Ok(Self {
            pipeline,
            params_buffer,
            bind_groups,
            particle_count: store.count(),
        })
    }

    /// Record one flocking step reading `slots.source` and writing `slots.dest`.
    ///
    /// `params` are staged with `Queue::write_buffer`, which lands before the
    /// next submission, so at most one dispatch may be recorded per submit.
    ///
    /// # Panics
    ///
    /// Panics if the two slots alias. Debug builds also panic if
    /// `params.particle_count` differs from the store's capacity.
    pub fn dispatch(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        queue: &wgpu::Queue,
        slots: FrameSlots,
        params: &SimParams,
    ) {
        assert_ne!(slots.source, slots.dest, "compute source and destination alias");
        debug_assert_eq!(slots.dest, 1 - slots.source);
        debug_assert_eq!(
            params.particle_count as i64,
            self.particle_count as i64,
            "SimParams.particle_count does not match the particle buffers"
        );

        queue.write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(params));

        let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Flocking Pass"),
            timestamp_writes: None,
        });
        compute_pass.set_pipeline(&self.pipeline);
        compute_pass.set_bind_group(0, &self.bind_groups[slots.source], &[]);
        compute_pass.dispatch_workgroups(workgroup_count(self.particle_count), 1, 1);
    }

    pub fn particle_count(&self) -> u32 {
        self.particle_count
    }
}
