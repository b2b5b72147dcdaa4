use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use boids::{Simulation, NUM_PARTICLES};
use clap::Parser;

/// Double-buffered GPU flocking simulation.
#[derive(Parser, Debug)]
#[command(name = "boids")]
struct Args {
    /// Number of particles
    #[arg(default_value_t = NUM_PARTICLES)]
    particle_count: u32,
    /// Seed for the initial state; taken from the clock when omitted
    seed: Option<u64>,
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("boids=info,wgpu=warn"))
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(clock_seed);

    match Simulation::new()
        .with_particle_count(args.particle_count)
        .with_seed(seed)
        .run()
    {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
