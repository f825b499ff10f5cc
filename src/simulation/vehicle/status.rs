use std::fmt;

use geo::Point;
use serde::Serialize;

/// Per-vehicle values for status displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleStatus {
    /// Center position.
    pub pos: Point<f32>,
    /// Index of the next waypoint.
    pub waypoint_index: usize,
    /// Scaled progress towards the next waypoint.
    pub current_waypoint_completion: f32,
    /// Credit for captured waypoints.
    pub track_completion: f32,
    /// Combined fitness.
    pub completion: f32,
    /// Whole seconds left before the stuck timeout.
    pub remaining_time: i32,
    /// Throttle command.
    pub throttle: f32,
    /// Total distance driven.
    pub odometer: f32,
    /// Current speed.
    pub speed: f32,
    /// Turn-rate command.
    pub turn_ratio: f32,
    /// Heading in degrees.
    pub heading_deg: f32,
    /// Sensor readings.
    pub sensors: Vec<f32>,
    /// Whether a sensor is below the collision threshold.
    pub collision: bool,
    /// Controller outputs.
    pub outputs: Vec<f32>,
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "POS=({}, {}) WPI={} WPC={}% TC={}% C={:.1}% M={}",
            self.pos.x() as i32,
            self.pos.y() as i32,
            self.waypoint_index,
            (100.0 * self.current_waypoint_completion) as i32,
            (100.0 * self.track_completion) as i32,
            100.0 * self.completion,
            self.remaining_time,
        )?;
        writeln!(
            f,
            "T={}% ODO={} SPD={:.2} TR={:.2} ST={}",
            (self.throttle * 100.0) as i32,
            self.odometer as i32,
            self.speed,
            self.turn_ratio,
            self.heading_deg as i32,
        )?;

        write!(f, "S=[ ")?;
        for reading in &self.sensors {
            write!(f, "{reading:.2} ")?;
        }
        writeln!(f, "] C={}", u8::from(self.collision))?;

        write!(f, "O=[")?;
        for (i, output) in self.outputs.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{output:.2}")?;
        }
        write!(f, "]")
    }
}
