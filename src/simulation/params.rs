//! Simulation parameters.
//!
//! Defaults reproduce the tuning the controller topology and track scale were
//! designed around. Parameters can be stored to and loaded from JSON.

use serde::{Deserialize, Serialize};

use super::error::Error;
use super::genetics::BreedingStrategy;

/// Simulation parameters that control vehicles, tracks and breeding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Vehicle footprint width.
    pub car_width: f32,
    /// Vehicle footprint length.
    pub car_length: f32,
    /// Number of distance sensors in the fan.
    pub sensor_count: usize,
    /// Total angular spread of the sensor fan in degrees.
    pub sensor_aperture_deg: f32,
    /// Maximum distance a sensor ray is traced.
    pub sensor_range: f32,
    /// Maximum absolute throttle command.
    pub throttle_max: f32,
    /// Speed decay per second when no throttle is applied.
    pub engine_brake: f32,
    /// Speed gained per second at full throttle.
    pub acceleration: f32,
    /// Heading change per second at unit turn command.
    pub turn_acceleration: f32,
    /// Maximum speed, in pixels moved per tick.
    pub speed_max: f32,
    /// Seconds a vehicle may go without improving its track completion.
    pub stuck_timeout: f32,
    /// A sensor reading below this value counts as a collision.
    pub collision_distance: f32,
    /// Neural controller layer sizes, from sensor inputs to the 2 control outputs.
    pub layer_sizes: Vec<usize>,
    /// Initial weights are drawn uniformly from `[-weight_range, weight_range]`.
    pub weight_range: f32,
    /// Capture radius of every waypoint.
    pub waypoint_radius: f32,
    /// Per-gene swap probability during crossover.
    pub crossover_probability: f32,
    /// Probability that a child genotype is mutated at all.
    pub mutation_genotype_probability: f32,
    /// Per-gene mutation probability.
    pub mutation_gene_probability: f32,
    /// Mutations add a uniform value in `[-amount, amount]`.
    pub mutation_gene_amount: f32,
    /// How each new generation is bred from the previous one.
    pub breeding: BreedingStrategy,
    /// Vehicles per generation. Must be even and at least 2.
    pub population_size: usize,
    /// Number of generations to run.
    pub generations: usize,
    /// Simulated seconds per tick.
    pub tick_seconds: f32,
    /// Hard cap on ticks per generation.
    pub max_ticks_per_generation: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            car_width: 10.0,
            car_length: 20.0,
            sensor_count: 5,
            sensor_aperture_deg: 100.0,
            sensor_range: 300.0,
            throttle_max: 1.0,
            engine_brake: 2.0,
            acceleration: 8.0,
            turn_acceleration: 4.0,
            speed_max: 2.0,
            stuck_timeout: 20.0,
            collision_distance: 0.02,
            layer_sizes: vec![5, 4, 3, 2],
            weight_range: 1.0,
            waypoint_radius: 25.0,
            crossover_probability: 0.6,
            mutation_genotype_probability: 1.0,
            mutation_gene_probability: 0.3,
            mutation_gene_amount: 2.0,
            breeding: BreedingStrategy::Leaders,
            population_size: 10,
            generations: 100,
            tick_seconds: 0.02,
            max_ticks_per_generation: 50_000,
        }
    }
}

impl Params {
    /// Offset of the sensor origin ahead of the vehicle center.
    pub fn sensor_offset(&self) -> f32 {
        self.car_length / 4.0
    }

    /// Checks that the parameters describe a runnable simulation.
    pub fn validate(&self) -> Result<(), Error> {
        if self.sensor_count < 2 {
            return Err(Error::Config(format!(
                "sensor_count must be at least 2, got {}",
                self.sensor_count
            )));
        }
        if self.sensor_range <= 0.0 {
            return Err(Error::Config("sensor_range must be positive".into()));
        }
        if self.layer_sizes.len() < 2 {
            return Err(Error::Config(
                "layer_sizes needs at least an input and an output size".into(),
            ));
        }
        if self.layer_sizes[0] != self.sensor_count {
            return Err(Error::Config(format!(
                "first layer size {} does not match sensor_count {}",
                self.layer_sizes[0], self.sensor_count
            )));
        }
        if self.layer_sizes.last() != Some(&2) {
            return Err(Error::Config(
                "last layer must have 2 outputs (throttle, turn)".into(),
            ));
        }
        if self.population_size < 2 || self.population_size % 2 == 1 {
            return Err(Error::Config(format!(
                "population_size must be even and at least 2, got {}",
                self.population_size
            )));
        }
        if self.tick_seconds <= 0.0 {
            return Err(Error::Config("tick_seconds must be positive".into()));
        }
        if self.weight_range <= 0.0 {
            return Err(Error::Config("weight_range must be positive".into()));
        }
        Ok(())
    }

    /// Saves the parameters to a JSON file.
    pub fn save_to_file(&self, path: &str) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads parameters from a JSON file. Missing fields take their defaults.
    pub fn load_from_file(path: &str) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&json)?;
        params.validate()?;
        Ok(params)
    }
}
