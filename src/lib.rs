//! # Carsim - Evolving Self-Driving Vehicles
//!
//! A simulation of vehicles with small neural network controllers that learn to
//! drive along a raster track through a genetic algorithm.
//!
//! ## Features
//!
//! - Feed-forward neural controllers (sigmoid units) with a flat genotype encoding
//! - Ray-cast distance sensors traced against a drivable-pixel mask
//! - Simple vehicle kinematics with engine braking and stuck detection
//! - Track parsing from a color-coded image (start marker, waypoints, walls)
//! - Waypoint-based progress scoring and leader selection
//! - Two-parent crossover and mutation to breed each new generation
//! - Parallel per-tick vehicle updates with rayon
//!
//! ## Core Modules
//!
//! - [`simulation::brain`] - Neural controller and genotype flattening
//! - [`simulation::vehicle`] - Kinematics, perception and lifecycle
//! - [`simulation::genetics`] - Crossover, mutation and population construction
//! - [`simulation::track`] - Track parsing, waypoint progress and ranking
//! - [`simulation::evolution`] - Generation driver on a synthetic clock

/// Core simulation logic and data structures.
pub mod simulation {
    /// Neural controller implementation for vehicles.
    pub mod brain;
    /// Error types for configuration, track parsing and breeding.
    pub mod error;
    /// Generation loop driver and leader snapshots.
    pub mod evolution;
    /// Genetic operators and population construction.
    pub mod genetics;
    /// Geometric helpers: rotation, distances and line tracing.
    pub mod geometric_utils;
    /// Simulation parameters.
    pub mod params;
    /// One generation of vehicles stepped together on a shared clock.
    pub mod population;
    /// Track raster, waypoints and progress scoring.
    pub mod track;
    /// Vehicle state, kinematics and sensors.
    pub mod vehicle;
}
