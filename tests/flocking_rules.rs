//! Flocking rule properties, checked against the CPU evaluation of the kernel.

use boids::particle::initial_particles;
use boids::reference::{step, step_into, step_particle};
use boids::{Particle, SimParams, Vec2, MAX_SPEED};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TOLERANCE: f32 = 1e-6;

fn params_for(particles: &[Particle]) -> SimParams {
    SimParams::default().with_particle_count(particles.len() as u32)
}

fn scenario_particles() -> Vec<Particle> {
    vec![
        Particle::at(Vec2::new(0.0, 0.0)),
        Particle::at(Vec2::new(0.05, 0.0)),
        Particle::at(Vec2::new(-0.05, 0.0)),
        Particle::at(Vec2::new(0.5, 0.5)),
    ]
}

fn scenario_params() -> SimParams {
    SimParams {
        delta_t: 0.04,
        rule1_distance: 0.1,
        rule2_distance: 0.1,
        rule3_distance: 0.1,
        rule1_scale: 0.02,
        rule2_scale: 0.05,
        rule3_scale: 0.005,
        particle_count: 4,
    }
}

// ============================================================================
// Boundary wrap
// ============================================================================

#[test]
fn test_positive_overflow_wraps_to_negative_edge() {
    let particles = vec![
        Particle::new(Vec2::new(1.001, 0.2), Vec2::new(0.05, 0.0)),
        Particle::at(Vec2::new(-0.5, -0.5)),
    ];
    let out = step(&particles, &params_for(&particles));

    assert_eq!(out[0].position.x, -1.0);
    assert_eq!(out[0].position.y, 0.2);
}

#[test]
fn test_negative_overflow_wraps_to_positive_edge() {
    let particles = vec![
        Particle::new(Vec2::new(0.3, -0.999), Vec2::new(0.0, -0.08)),
        Particle::at(Vec2::new(0.9, 0.9)),
    ];
    let out = step(&particles, &params_for(&particles));

    assert_eq!(out[0].position.y, 1.0);
    assert!((out[0].position.x - 0.3).abs() < TOLERANCE);
}

#[test]
fn test_positions_stay_in_domain() {
    let particles = initial_particles(300, 11);
    let params = params_for(&particles);

    let mut current = particles;
    for _ in 0..5 {
        current = step(&current, &params);
        for p in &current {
            assert!((-1.0..=1.0).contains(&p.position.x), "{:?}", p);
            assert!((-1.0..=1.0).contains(&p.position.y), "{:?}", p);
        }
    }
}

// ============================================================================
// Speed cap
// ============================================================================

#[test]
fn test_huge_rule_scales_are_clamped() {
    let particles = vec![
        Particle::at(Vec2::new(0.0, 0.0)),
        Particle::at(Vec2::new(0.01, 0.0)),
        Particle::at(Vec2::new(0.03, 0.0)),
    ];
    let params = SimParams {
        rule1_distance: 0.1,
        rule2_distance: 0.1,
        rule3_distance: 0.1,
        rule1_scale: 500.0,
        rule2_scale: 1000.0,
        rule3_scale: 500.0,
        ..params_for(&particles)
    };

    for p in step(&particles, &params) {
        // Every particle feels a net push here, so the cap must be hit exactly.
        assert!((p.velocity.length() - MAX_SPEED).abs() < TOLERANCE, "{:?}", p);
    }
}

#[test]
fn test_random_inputs_respect_speed_cap() {
    let mut rng = StdRng::seed_from_u64(99);
    let particles: Vec<Particle> = (0..200)
        .map(|_| {
            Particle::new(
                Vec2::new(rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0)),
                Vec2::new(rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0)),
            )
        })
        .collect();
    let params = SimParams {
        rule1_distance: 0.3,
        rule2_distance: 0.2,
        rule3_distance: 0.3,
        rule1_scale: 10.0,
        rule2_scale: 10.0,
        rule3_scale: 10.0,
        ..params_for(&particles)
    };

    for p in step(&particles, &params) {
        assert!(p.velocity.length() <= MAX_SPEED + TOLERANCE);
        assert!((-1.0..=1.0).contains(&p.position.x));
        assert!((-1.0..=1.0).contains(&p.position.y));
    }
}

// ============================================================================
// No-neighbour stability
// ============================================================================

#[test]
fn test_isolated_particle_moves_ballistically() {
    let lonely = Particle::new(Vec2::new(0.3, -0.2), Vec2::new(0.05, 0.02));
    let particles = vec![
        lonely,
        Particle::new(Vec2::new(-0.8, 0.8), Vec2::new(-0.03, 0.01)),
        Particle::new(Vec2::new(0.9, -0.9), Vec2::new(0.02, 0.04)),
    ];
    let params = params_for(&particles);

    let out = step_particle(&particles, 0, &params);
    assert_eq!(out.velocity, lonely.velocity);
    assert_eq!(out.position, lonely.position + lonely.velocity * params.delta_t);
}

#[test]
fn test_single_particle_population() {
    let particles = vec![Particle::new(Vec2::new(0.0, 0.0), Vec2::new(0.01, -0.01))];
    let params = params_for(&particles);

    let out = step(&particles, &params);
    assert_eq!(out[0].velocity, particles[0].velocity);
    assert_eq!(out[0].position, particles[0].velocity * params.delta_t);
}

// ============================================================================
// Determinism and buffer discipline
// ============================================================================

#[test]
fn test_identical_inputs_give_identical_bytes() {
    let particles = initial_particles(500, 5);
    let params = params_for(&particles);

    let a = step(&particles, &params);
    let b = step(&particles, &params);
    assert_eq!(
        bytemuck::cast_slice::<Particle, u8>(&a),
        bytemuck::cast_slice::<Particle, u8>(&b)
    );
}

#[test]
fn test_index_order_does_not_matter() {
    let particles = initial_particles(128, 8);
    let params = params_for(&particles);
    let forward = step(&particles, &params);

    // Evaluate indices back to front, as a GPU might.
    let mut backward = vec![Particle::at(Vec2::ZERO); particles.len()];
    for i in (0..particles.len()).rev() {
        backward[i] = step_particle(&particles, i, &params);
    }
    assert_eq!(forward, backward);
}

#[test]
fn test_source_is_left_untouched() {
    let particles = initial_particles(64, 2);
    let snapshot = particles.clone();
    let mut dest = vec![Particle::at(Vec2::ZERO); particles.len()];

    step_into(&particles, &mut dest, &params_for(&particles));
    assert_eq!(particles, snapshot);
    assert_ne!(dest, snapshot);
}

#[test]
#[should_panic]
fn test_mismatched_count_panics() {
    let particles = initial_particles(8, 1);
    let params = SimParams::default().with_particle_count(9);
    let _ = step(&particles, &params);
}

// ============================================================================
// Four-particle scenario
// ============================================================================

#[test]
fn test_scenario_isolated_and_centre_particles_stay_put() {
    let particles = scenario_particles();
    let out = step(&particles, &scenario_params());

    // The far particle has no neighbours and no velocity.
    assert_eq!(out[3], particles[3]);

    // The centre particle sits on its neighbours' centroid and the
    // separation pushes from both sides cancel.
    assert!(out[0].position.length() < TOLERANCE);
    assert!(out[0].velocity.length() < TOLERANCE);
}

#[test]
fn test_scenario_cluster_is_symmetric() {
    let out = step(&scenario_particles(), &scenario_params());

    assert!((out[1].velocity.x + out[2].velocity.x).abs() < TOLERANCE);
    assert_eq!(out[1].velocity.y, 0.0);
    assert_eq!(out[2].velocity.y, 0.0);
    assert!((out[1].position.x + out[2].position.x).abs() < TOLERANCE);
}

#[test]
fn test_scenario_cohesion_pulls_towards_centroid() {
    let params = SimParams {
        rule2_scale: 0.0,
        ..scenario_params()
    };
    let particles = scenario_particles();
    let out = step(&particles, &params);

    assert!(out[1].velocity.x < 0.0);
    assert!(out[2].velocity.x > 0.0);
    assert!(out[1].position.x < particles[1].position.x);
    assert!(out[2].position.x > particles[2].position.x);
    assert_eq!(out[3], particles[3]);
}

#[test]
fn test_scenario_separation_outweighs_cohesion_at_this_spacing() {
    let particles = scenario_particles();
    let out = step(&particles, &scenario_params());

    // rule2_scale * 0.05 beats rule1_scale * 0.05 for the outer pair.
    assert!(out[1].velocity.x > 0.0);
    assert!(out[2].velocity.x < 0.0);
}
