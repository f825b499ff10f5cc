//! Generation driver.
//!
//! Runs generations back to back on a synthetic clock: breed a population from
//! the previous leaders, place it on the track, tick until every vehicle is
//! dead (or the tick cap is hit) and remember the new leaders.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::brain::Brain;
use super::error::Error;
use super::genetics;
use super::params::Params;
use super::population::Population;
use super::track::Track;
use super::vehicle::Vehicle;

/// Summary of one finished generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Generation number, starting at 0.
    pub generation: u32,
    /// Ticks simulated.
    pub ticks: usize,
    /// True if the tick cap ended the generation before every vehicle died.
    pub timed_out: bool,
    /// Completion of the best vehicle.
    pub best_completion: f32,
    /// Completion of the second-best vehicle, if any.
    pub second_best_completion: Option<f32>,
    /// Vehicles that captured every waypoint.
    pub completed: usize,
}

/// Genotypes of a generation's leaders, for resuming a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderSnapshot {
    /// Generation the leaders come from.
    pub generation: u32,
    /// Genotype of the best vehicle.
    pub best: Vec<f32>,
    /// Genotype of the second-best vehicle.
    pub second_best: Vec<f32>,
}

impl LeaderSnapshot {
    /// Saves the snapshot to a JSON file.
    pub fn save_to_file(&self, path: &str) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads a snapshot from a JSON file.
    pub fn load_from_file(path: &str) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Breeds and runs generations.
#[derive(Debug, Clone)]
pub struct EvolutionEngine {
    params: Params,
    generation: u32,
    /// Previous generation and the indices of its leaders.
    previous: Option<(Population, usize, Option<usize>)>,
}

impl EvolutionEngine {
    /// Creates an engine; the first generation will be random.
    pub fn new(params: Params) -> Result<Self, Error> {
        params.validate()?;
        Ok(Self {
            params,
            generation: 0,
            previous: None,
        })
    }

    /// Creates an engine whose next generation is bred from stored leaders.
    pub fn resume(params: Params, snapshot: &LeaderSnapshot) -> Result<Self, Error> {
        params.validate()?;

        let mut best = Brain::new(&params.layer_sizes)?;
        best.set_weights(&snapshot.best)?;
        let mut second = Brain::new(&params.layer_sizes)?;
        second.set_weights(&snapshot.second_best)?;
        let best = Vehicle::from_brain(0, 0.0, best, &params);
        let second = Vehicle::from_brain(1, 0.0, second, &params);

        Ok(Self {
            params,
            generation: snapshot.generation + 1,
            previous: Some((Population::new(vec![best, second]), 0, Some(1))),
        })
    }

    /// Parameters in use.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Number of the next generation to run.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Best and second-best vehicles of the last finished generation.
    pub fn leaders(&self) -> (Option<&Vehicle>, Option<&Vehicle>) {
        match &self.previous {
            Some((population, best, second)) => (
                population.vehicles.get(*best),
                second.and_then(|s| population.vehicles.get(s)),
            ),
            None => (None, None),
        }
    }

    /// Genotypes of the last leaders, if both exist.
    pub fn snapshot(&self) -> Option<LeaderSnapshot> {
        let (Some(best), Some(second)) = self.leaders() else {
            return None;
        };
        Some(LeaderSnapshot {
            generation: self.generation.saturating_sub(1),
            best: best.genotype(),
            second_best: second.genotype(),
        })
    }

    /// Breeds the next population and places it on the track.
    pub fn next_population<R: Rng + ?Sized>(
        &self,
        track: &Track,
        rng: &mut R,
    ) -> Result<Population, Error> {
        let (best, second) = self.leaders();
        let previous = self
            .previous
            .as_ref()
            .map(|(population, _, _)| population.vehicles.as_slice())
            .unwrap_or_default();

        let vehicles = genetics::create_population_with(
            self.params.breeding,
            self.params.population_size,
            previous,
            best,
            second,
            &self.params,
            rng,
        )?;

        let mut population = Population::new(vehicles);
        population.place(track);
        Ok(population)
    }

    /// Runs one full generation and keeps its leaders for breeding the next.
    pub fn run_generation<R: Rng + ?Sized>(
        &mut self,
        track: &Track,
        rng: &mut R,
    ) -> Result<GenerationReport, Error> {
        let mut population = self.next_population(track, rng)?;

        let mut ticks = 0;
        while !population.all_done() && ticks < self.params.max_ticks_per_generation {
            population.step(track, &self.params)?;
            ticks += 1;
        }

        let timed_out = !population.all_done();
        if timed_out {
            warn!(
                generation = self.generation,
                ticks,
                alive = population.alive_count(),
                "generation hit the tick cap"
            );
        }

        let (best, second) = population.leaders();
        let Some(best) = best else {
            return Err(Error::Config("population is empty".into()));
        };

        let report = GenerationReport {
            generation: self.generation,
            ticks,
            timed_out,
            best_completion: population.vehicles[best].completion(),
            second_best_completion: second.map(|s| population.vehicles[s].completion()),
            completed: population.completed_count(),
        };

        debug!(
            best_id = best,
            second_id = ?second,
            odometer = population.vehicles[best].odometer,
            "selected leaders"
        );
        info!(
            generation = report.generation,
            ticks = report.ticks,
            best = report.best_completion,
            completed = report.completed,
            "finished generation"
        );

        self.previous = Some((population, best, second));
        self.generation += 1;
        Ok(report)
    }
}
