//! CPU evaluation of the flocking kernel.
//!
//! Mirrors `compute.wgsl` one output index at a time. The running simulation
//! never uses it; it exists so GPU results can be checked for parity and the
//! rule semantics can be tested without a device.

use glam::Vec2;

use crate::particle::{Particle, SimParams, MAX_SPEED};

/// Advance every particle of `source` by one step.
///
/// # Panics
///
/// Panics if `source.len()` differs from `params.particle_count`.
pub fn step(source: &[Particle], params: &SimParams) -> Vec<Particle> {
    let mut dest = vec![Particle::at(Vec2::ZERO); source.len()];
    step_into(source, &mut dest, params);
    dest
}

/// Advance `source` by one step, writing the result into `dest`.
///
/// The borrow rules already keep `source` and `dest` apart, which is the same
/// non-aliasing requirement the GPU buffers have.
///
/// # Panics
///
/// Panics if either slice length differs from `params.particle_count`.
pub fn step_into(source: &[Particle], dest: &mut [Particle], params: &SimParams) {
    let count = params.count() as usize;
    assert_eq!(source.len(), count, "source holds a different particle count");
    assert_eq!(dest.len(), count, "destination holds a different particle count");

    for (index, out) in dest.iter_mut().enumerate() {
        *out = step_particle(source, index, params);
    }
}

/// Compute the next state of `source[index]` from the full snapshot.
pub fn step_particle(source: &[Particle], index: usize, params: &SimParams) -> Particle {
    let me = source[index];

    let mut cohesion_sum = Vec2::ZERO;
    let mut cohesion_count = 0u32;
    let mut separation_sum = Vec2::ZERO;
    let mut alignment_sum = Vec2::ZERO;
    let mut alignment_count = 0u32;

    for (j, other) in source.iter().enumerate() {
        if j == index {
            continue;
        }

        let d = other.position.distance(me.position);
        if d < params.rule1_distance {
            cohesion_sum += other.position;
            cohesion_count += 1;
        }
        if d < params.rule2_distance {
            separation_sum -= other.position - me.position;
        }
        if d < params.rule3_distance {
            alignment_sum += other.velocity;
            alignment_count += 1;
        }
    }

    let cohesion = if cohesion_count > 0 {
        (cohesion_sum / cohesion_count as f32 - me.position) * params.rule1_scale
    } else {
        Vec2::ZERO
    };
    let alignment = if alignment_count > 0 {
        alignment_sum / alignment_count as f32 * params.rule3_scale
    } else {
        Vec2::ZERO
    };
    // Pairwise repulsions add up; there is no averaging for separation.
    let separation = separation_sum * params.rule2_scale;

    let velocity = limit_speed(me.velocity + cohesion + separation + alignment);
    let position = wrap_position(me.position + velocity * params.delta_t);

    Particle { position, velocity }
}

/// Rescale `velocity` to [`MAX_SPEED`] if it is any faster.
pub fn limit_speed(velocity: Vec2) -> Vec2 {
    if velocity.length() > MAX_SPEED {
        velocity.normalize() * MAX_SPEED
    } else {
        velocity
    }
}

/// Toroidal wrap of each axis into `[-1, 1]`.
pub fn wrap_position(position: Vec2) -> Vec2 {
    Vec2::new(wrap_axis(position.x), wrap_axis(position.y))
}

fn wrap_axis(value: f32) -> f32 {
    if value < -1.0 {
        1.0
    } else if value > 1.0 {
        -1.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_axis() {
        assert_eq!(wrap_axis(1.01), -1.0);
        assert_eq!(wrap_axis(-1.01), 1.0);
        assert_eq!(wrap_axis(1.0), 1.0);
        assert_eq!(wrap_axis(-1.0), -1.0);
        assert_eq!(wrap_axis(0.25), 0.25);
    }

    #[test]
    fn test_limit_speed() {
        let slow = Vec2::new(0.03, 0.04);
        assert_eq!(limit_speed(slow), slow);

        let fast = limit_speed(Vec2::new(3.0, 4.0));
        assert!((fast.length() - MAX_SPEED).abs() < 1e-6);
        assert!((fast.x / fast.y - 0.75).abs() < 1e-5);

        assert_eq!(limit_speed(Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn test_separation_is_not_averaged() {
        let params = SimParams {
            delta_t: 0.0,
            rule1_distance: 0.0,
            rule2_distance: 0.5,
            rule3_distance: 0.0,
            rule1_scale: 0.0,
            rule2_scale: 0.1,
            rule3_scale: 0.0,
            particle_count: 3,
        };
        // Two neighbours stacked on the same side push twice as hard as one.
        let source = [
            Particle::at(Vec2::ZERO),
            Particle::at(Vec2::new(0.1, 0.0)),
            Particle::at(Vec2::new(0.1, 0.0)),
        ];
        let out = step_particle(&source, 0, &params);
        assert!((out.velocity.x - (-0.02)).abs() < 1e-6);
        assert_eq!(out.velocity.y, 0.0);
    }
}
