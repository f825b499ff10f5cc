use geo::Point;
use serde::{Deserialize, Serialize};

/// A checkpoint vehicles must pass, in track order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Center of the waypoint.
    pub pos: Point<f32>,
    /// A vehicle closer than this has reached the waypoint.
    pub radius: f32,
}

impl Waypoint {
    /// Creates a waypoint at `(x, y)`.
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self {
            pos: Point::new(x, y),
            radius,
        }
    }
}
