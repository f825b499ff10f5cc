//! Vehicle state, kinematics and lifecycle.
//!
//! Vehicles drive themselves with their [`Brain`], perceive the track through
//! ray-cast sensors and die on collision or when they stop making progress.
//! All time values are seconds on the caller's simulation clock.

use std::f32::consts::FRAC_PI_2;

use geo::Point;
use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::super::brain::Brain;
use super::super::error::BrainError;
use super::super::geometric_utils::{distance, rotate};
use super::super::params::Params;
use super::super::track::Track;
use super::sensors::{SensorTrace, cast_ray, sensor_angles};
use super::status::VehicleStatus;

/// A self-driving vehicle with a neural network controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    /// Index of this vehicle within its population.
    pub id: usize,
    /// Center position.
    pub pos: Point<f32>,
    /// Heading in radians. Forward is `heading + π/2`.
    pub heading: f32,
    /// Current speed, in pixels per tick.
    pub speed: f32,
    /// Throttle command, clamped to `[-throttle_max, throttle_max]` on update.
    pub throttle: f32,
    /// Turn-rate command.
    pub turn_ratio: f32,
    /// Total distance driven.
    pub odometer: f32,
    /// False once the vehicle crashed or got stuck.
    pub alive: bool,
    /// Paused vehicles keep their state and stuck timer frozen.
    pub paused: bool,
    /// Clock time when the vehicle was paused.
    pub paused_at: f32,
    /// The vehicle dies if its track completion has not improved by this time.
    pub stuck_deadline: f32,
    /// Highest track completion seen by the stuck check.
    pub best_track_completion: f32,
    /// Latest sensor readings, each in `[0, 1]`.
    pub sensors: Array1<f32>,
    /// Latest controller outputs: throttle and centered turn.
    pub outputs: Array1<f32>,
    /// Neural network that drives the vehicle.
    pub brain: Brain,
    /// Index of the next waypoint to reach.
    pub waypoint_index: usize,
    /// Partial credit towards the next waypoint, already scaled by the waypoint share.
    pub current_waypoint_completion: f32,
    /// Credit for captured waypoints, in `[0, 1]`.
    pub track_completion: f32,
    /// Sensor clipping area (width, height). `None` uses the track bounds.
    pub sensor_bounds: Option<(u32, u32)>,
    /// Sensor rays from the latest [`Vehicle::sense`].
    pub traces: Vec<SensorTrace>,
    last_update: Option<f32>,
}

impl Vehicle {
    /// Creates a vehicle at the origin with a random-weight brain drawn from `rng`.
    ///
    /// The stuck timer is armed relative to clock time 0.
    pub fn new<R: Rng + ?Sized>(
        id: usize,
        heading: f32,
        params: &Params,
        rng: &mut R,
    ) -> Result<Self, BrainError> {
        let brain = Brain::new_random(
            &params.layer_sizes,
            -params.weight_range,
            params.weight_range,
            rng,
        )?;
        Ok(Self::from_brain(id, heading, brain, params))
    }

    /// Creates a vehicle at the origin driven by `brain`.
    pub fn from_brain(id: usize, heading: f32, brain: Brain, params: &Params) -> Self {
        Self {
            id,
            pos: Point::new(0.0, 0.0),
            heading,
            speed: 0.0,
            throttle: 0.0,
            turn_ratio: 0.0,
            odometer: 0.0,
            alive: true,
            paused: false,
            paused_at: 0.0,
            stuck_deadline: params.stuck_timeout,
            best_track_completion: 0.0,
            sensors: Array1::ones(params.sensor_count),
            outputs: Array1::zeros(2),
            brain,
            waypoint_index: 0,
            current_waypoint_completion: 0.0,
            track_completion: 0.0,
            sensor_bounds: None,
            traces: Vec::new(),
            last_update: None,
        }
    }

    /// Places the vehicle at `pos`.
    pub fn set_pos(&mut self, pos: Point<f32>) {
        self.pos = pos;
    }

    /// Restricts sensors to the `(width, height)` area.
    pub fn set_sensor_bounds(&mut self, bounds: (u32, u32)) {
        self.sensor_bounds = Some(bounds);
    }

    /// Sets the throttle command directly.
    pub fn set_throttle(&mut self, throttle: f32) {
        self.throttle = throttle;
    }

    /// Sets the turn-rate command directly.
    pub fn set_turn_ratio(&mut self, turn_ratio: f32) {
        self.turn_ratio = turn_ratio;
    }

    /// Combined fitness: captured waypoints plus progress towards the next one.
    pub fn completion(&self) -> f32 {
        self.track_completion + self.current_waypoint_completion
    }

    /// True once every waypoint has been captured.
    pub fn completed(&self) -> bool {
        self.track_completion >= 1.0
    }

    /// True if any sensor reading is below the collision threshold.
    pub fn collision(&self, params: &Params) -> bool {
        self.sensors
            .iter()
            .any(|&reading| reading < params.collision_distance)
    }

    /// Advances the kinematics by `dt` seconds.
    ///
    /// A colliding vehicle dies without any other change. Paused and dead
    /// vehicles do not move.
    pub fn update(&mut self, dt: f32, params: &Params) {
        if !self.alive {
            return;
        }
        if self.collision(params) {
            self.alive = false;
            return;
        }
        if self.paused {
            return;
        }

        self.throttle = self
            .throttle
            .clamp(-params.throttle_max, params.throttle_max);

        if self.throttle.abs() > 0.0 {
            self.speed += self.throttle * params.acceleration * dt;
        } else if self.speed > 0.0 {
            self.speed = (self.speed - params.engine_brake * dt).max(0.0);
        } else {
            self.speed = (self.speed + params.engine_brake * dt).min(0.0);
        }

        // no reversing
        self.speed = self.speed.clamp(0.0, params.speed_max);

        self.heading += self.turn_ratio * params.turn_acceleration * dt;

        let previous = self.pos;
        let (sin, cos) = (self.heading + FRAC_PI_2).sin_cos();
        self.pos = Point::new(
            self.pos.x() + cos * self.speed,
            self.pos.y() + sin * self.speed,
        );

        self.odometer += distance(previous, self.pos);
    }

    /// Advances the kinematics to clock time `now`.
    ///
    /// The step length is the time since the previous call; the first call uses 0.
    pub fn update_at(&mut self, now: f32, params: &Params) {
        let dt = self.last_update.map_or(0.0, |last| (now - last).max(0.0));
        self.last_update = Some(now);
        self.update(dt, params);
    }

    /// Refreshes every sensor reading against the track.
    pub fn sense(&mut self, track: &Track, params: &Params) {
        if !self.alive {
            return;
        }

        let bounds = self.sensor_bounds.unwrap_or_else(|| track.bounds());
        self.traces = sensor_angles(params)
            .into_iter()
            .map(|angle| cast_ray(self.pos, self.heading, angle, bounds, track, params))
            .collect();
        self.sensors = self.traces.iter().map(|trace| trace.reading).collect();
    }

    /// Computes controller outputs from the current sensor readings.
    ///
    /// The turn output is shifted by -0.5 so that it is centered on zero.
    pub fn autopilot(&mut self) -> Result<(), BrainError> {
        if !self.alive {
            return Ok(());
        }

        let mut outputs = self.brain.think(&self.sensors)?;
        if outputs.len() < 2 {
            return Err(BrainError::OutputSize {
                expected: 2,
                actual: outputs.len(),
            });
        }
        outputs[1] -= 0.5;
        self.outputs = outputs;
        Ok(())
    }

    /// Applies the latest controller outputs as throttle and turn commands.
    pub fn apply(&mut self) {
        self.throttle = self.outputs[0];
        self.turn_ratio = self.outputs[1];
    }

    /// Kills the vehicle if its track completion stopped improving.
    ///
    /// Any improvement over the best completion seen so far re-arms the timer.
    pub fn check_for_stuck(&mut self, now: f32, params: &Params) {
        if !self.alive || self.paused {
            return;
        }

        if self.track_completion > self.best_track_completion {
            self.stuck_deadline = now + params.stuck_timeout;
            self.best_track_completion = self.track_completion;
        } else if now > self.stuck_deadline {
            self.alive = false;
        }
    }

    /// Freezes the vehicle and its stuck timer.
    pub fn pause(&mut self, now: f32) {
        if self.paused {
            return;
        }
        self.paused = true;
        self.paused_at = now;
    }

    /// Resumes the vehicle, pushing the stuck deadline back by the paused time.
    pub fn resume(&mut self, now: f32) {
        if !self.paused {
            return;
        }
        self.paused = false;
        self.stuck_deadline += now - self.paused_at;
    }

    /// Whole seconds left before the stuck timeout; 0 for dead vehicles.
    pub fn remaining_time(&self, now: f32) -> i32 {
        if !self.alive {
            return 0;
        }
        let reference = if self.paused { self.paused_at } else { now };
        (self.stuck_deadline - reference) as i32
    }

    /// Revives the vehicle and clears its progress, keeping position and brain.
    pub fn reset(&mut self, now: f32, params: &Params) {
        self.alive = true;
        self.paused = false;
        self.stuck_deadline = now + params.stuck_timeout;
        self.odometer = 0.0;
        self.track_completion = 0.0;
        self.waypoint_index = 0;
        self.current_waypoint_completion = 0.0;
        self.best_track_completion = 0.0;
        self.sensors = Array1::ones(params.sensor_count);
        self.last_update = None;
    }

    /// Flattened controller weights.
    pub fn genotype(&self) -> Vec<f32> {
        self.brain.to_flat_vector()
    }

    /// Replaces the controller weights.
    pub fn set_genotype(&mut self, genes: &[f32]) -> Result<(), BrainError> {
        self.brain.set_weights(genes)
    }

    /// Footprint corners in world coordinates.
    pub fn outline(&self, params: &Params) -> [Point<f32>; 4] {
        let half_width = params.car_width / 2.0;
        let half_length = params.car_length / 2.0;
        let corners = [
            (-half_width, half_length),
            (half_width, half_length),
            (half_width, -half_length),
            (-half_width, -half_length),
        ];

        corners.map(|(x, y)| {
            let (rx, ry) = rotate(x, y, self.heading);
            Point::new(rx + self.pos.x(), ry + self.pos.y())
        })
    }

    /// Snapshot of the values shown next to a vehicle.
    pub fn status(&self, now: f32, params: &Params) -> VehicleStatus {
        VehicleStatus {
            pos: self.pos,
            waypoint_index: self.waypoint_index,
            current_waypoint_completion: self.current_waypoint_completion,
            track_completion: self.track_completion,
            completion: self.completion(),
            remaining_time: self.remaining_time(now),
            throttle: self.throttle,
            odometer: self.odometer,
            speed: self.speed,
            turn_ratio: self.turn_ratio,
            heading_deg: self.heading.to_degrees(),
            sensors: self.sensors.to_vec(),
            collision: self.collision(params),
            outputs: self.outputs.to_vec(),
        }
    }
}
