//! WGSL sources and the constants that must agree with them.

/// Flocking kernel: reads one particle generation, writes the other.
pub const COMPUTE_SOURCE: &str = include_str!("compute.wgsl");

/// Sprite program: orients the triangle along each particle's velocity.
pub const SPRITE_SOURCE: &str = include_str!("sprite.wgsl");

pub const COMPUTE_ENTRY: &str = "main";
pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Lanes per compute workgroup. Must match `@workgroup_size` in `compute.wgsl`.
pub const WORKGROUP_SIZE: u32 = 64;

/// Number of workgroups needed to cover `particle_count` indices.
pub fn workgroup_count(particle_count: u32) -> u32 {
    particle_count.div_ceil(WORKGROUP_SIZE)
}
