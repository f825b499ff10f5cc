//! One generation of vehicles stepped together on a shared simulation clock.
//!
//! Each tick runs, for every vehicle: controller → kinematics → stuck check →
//! sensors → waypoint scoring. Vehicles only read the track, so the per-vehicle
//! phase runs in parallel with rayon.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::BrainError;
use super::params::Params;
use super::track::{self, Track};
use super::vehicle::Vehicle;

/// The vehicles of one generation and the clock they share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Population {
    /// Vehicles, indexed by their `id`.
    pub vehicles: Vec<Vehicle>,
    /// Simulation clock, in seconds since the population was created.
    pub time: f32,
    /// Ticks stepped so far; `time` is derived from it.
    pub ticks: u64,
}

impl Population {
    /// Wraps freshly created vehicles; the clock starts at 0.
    pub fn new(vehicles: Vec<Vehicle>) -> Self {
        Self {
            vehicles,
            time: 0.0,
            ticks: 0,
        }
    }

    /// Puts every vehicle on the start position and clips its sensors to the track.
    pub fn place(&mut self, track: &Track) {
        for vehicle in &mut self.vehicles {
            vehicle.set_pos(track.start());
            vehicle.set_sensor_bounds(track.bounds());
        }
    }

    /// Advances the clock by one tick and steps every vehicle.
    pub fn step(&mut self, track: &Track, params: &Params) -> Result<(), BrainError> {
        self.ticks += 1;
        // multiply rather than accumulate so long runs do not drift
        self.time = (self.ticks as f64 * f64::from(params.tick_seconds)) as f32;
        let now = self.time;

        self.vehicles
            .par_iter_mut()
            .try_for_each(|vehicle| step_vehicle(vehicle, track, now, params))
    }

    /// Pauses every vehicle.
    pub fn pause(&mut self) {
        for vehicle in &mut self.vehicles {
            vehicle.pause(self.time);
        }
    }

    /// Resumes every vehicle, shifting their stuck deadlines by the paused time.
    pub fn resume(&mut self) {
        for vehicle in &mut self.vehicles {
            vehicle.resume(self.time);
        }
    }

    /// Indices of the best and second-best vehicles.
    pub fn leaders(&self) -> (Option<usize>, Option<usize>) {
        track::best_cars(&self.vehicles)
    }

    /// True when no vehicle is alive.
    pub fn all_done(&self) -> bool {
        track::all_done(&self.vehicles)
    }

    /// Number of vehicles that captured every waypoint.
    pub fn completed_count(&self) -> usize {
        self.vehicles.iter().filter(|v| v.completed()).count()
    }

    /// Number of vehicles still alive.
    pub fn alive_count(&self) -> usize {
        self.vehicles.iter().filter(|v| v.alive).count()
    }

    /// Number of vehicles.
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    /// True for a population without vehicles.
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }
}

fn step_vehicle(
    vehicle: &mut Vehicle,
    track: &Track,
    now: f32,
    params: &Params,
) -> Result<(), BrainError> {
    vehicle.autopilot()?;
    vehicle.apply();
    vehicle.update_at(now, params);
    vehicle.check_for_stuck(now, params);
    vehicle.sense(track, params);
    track.update_distance_to_next_waypoint(vehicle);
    Ok(())
}
