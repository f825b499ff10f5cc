//! Headless trainer: evolves vehicles on a track image and logs each generation.
//!
//! Usage:
//!   carsim <track.png> [--config params.json] [--generations N] [--population N]
//!          [--seed S] [--resume leaders.json] [--save leaders.json]
//!
//! Set `RUST_LOG=carsim=debug` for per-generation leader details.

use std::process::ExitCode;

use carsim::simulation::error::Error;
use carsim::simulation::evolution::{EvolutionEngine, LeaderSnapshot};
use carsim::simulation::params::Params;
use carsim::simulation::track::Track;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "carsim")]
#[command(about = "Evolve neural-network vehicles that learn to drive a raster track")]
struct Args {
    /// Path to the track image
    track: String,
    /// JSON file with simulation parameters
    #[arg(short, long)]
    config: Option<String>,
    /// Number of generations to run (overrides the config)
    #[arg(short, long)]
    generations: Option<usize>,
    /// Vehicles per generation (overrides the config)
    #[arg(short, long)]
    population: Option<usize>,
    /// Seed for the breeding random number generator
    #[arg(long)]
    seed: Option<u64>,
    /// Leader snapshot to resume breeding from
    #[arg(long)]
    resume: Option<String>,
    /// Where to save the final leader snapshot
    #[arg(long)]
    save: Option<String>,
}

fn run(args: &Args) -> Result<(), Error> {
    let mut params = match &args.config {
        Some(path) => Params::load_from_file(path)?,
        None => Params::default(),
    };
    if let Some(generations) = args.generations {
        params.generations = generations;
    }
    if let Some(population) = args.population {
        params.population_size = population;
    }
    params.validate()?;

    let track = Track::load(&args.track, &params)?;
    info!(
        waypoints = track.num_waypoints(),
        start_x = track.start().x(),
        start_y = track.start().y(),
        "loaded track {}",
        args.track
    );

    let mut rng = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };

    let mut engine = match &args.resume {
        Some(path) => EvolutionEngine::resume(params.clone(), &LeaderSnapshot::load_from_file(path)?)?,
        None => EvolutionEngine::new(params.clone())?,
    };

    let mut total_completed = 0;
    for _ in 0..params.generations {
        let report = engine.run_generation(&track, &mut rng)?;
        total_completed += report.completed;
    }
    info!(
        generations = params.generations,
        total_completed, "training finished"
    );

    if let Some(path) = &args.save {
        if let Some(snapshot) = engine.snapshot() {
            snapshot.save_to_file(path)?;
            info!("saved leaders to {}", path);
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
