//! Ray-cast distance sensors.
//!
//! Sensors fan out across the aperture, centered on the vehicle's forward
//! direction. Each ray is traced pixel by pixel against the track's drivable
//! mask and reports how much of its range is clear.

use geo::Point;
use serde::{Deserialize, Serialize};

use super::super::geometric_utils::{pixel_distance, rotate, trace_line};
use super::super::params::Params;
use super::super::track::Track;

/// Geometry and result of one sensor ray.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorTrace {
    /// Pixel the ray starts from.
    pub origin: (i32, i32),
    /// Pixel the ray would reach with nothing in the way.
    pub end: (i32, i32),
    /// First blocked pixel, or `end` if the ray is clear.
    pub hit: (i32, i32),
    /// Clear distance as a fraction of the sensor range: 1.0 = clear, 0.0 = blocked.
    pub reading: f32,
}

/// Ray angles in the vehicle frame, where `π/2` points forward.
///
/// A single sensor points straight ahead; zero sensors give no rays.
pub fn sensor_angles(params: &Params) -> Vec<f32> {
    if params.sensor_count < 2 {
        return vec![std::f32::consts::FRAC_PI_2; params.sensor_count];
    }

    let aperture = params.sensor_aperture_deg.to_radians();
    let first = std::f32::consts::FRAC_PI_2 - aperture / 2.0;
    let step = aperture / (params.sensor_count - 1) as f32;

    (0..params.sensor_count)
        .map(|i| first + step * i as f32)
        .collect()
}

/// Traces one sensor ray for a vehicle at `pos` with the given `heading`.
///
/// `angle` is in the vehicle frame (see [`sensor_angles`]). Pixels outside
/// `bounds` (width, height) or outside the track raster count as walls.
pub fn cast_ray(
    pos: Point<f32>,
    heading: f32,
    angle: f32,
    bounds: (u32, u32),
    track: &Track,
    params: &Params,
) -> SensorTrace {
    let offset = params.sensor_offset();
    let range = params.sensor_range;

    let (sx, sy) = rotate(0.0, offset, heading);
    let origin = ((sx + pos.x()) as i32, (sy + pos.y()) as i32);

    let (ex, ey) = rotate(
        range * angle.cos(),
        offset + range * angle.sin(),
        heading,
    );
    let end = ((ex + pos.x()) as i32, (ey + pos.y()) as i32);

    let (width, height) = (bounds.0 as i32, bounds.1 as i32);
    let hit = trace_line(origin, end, |x, y| {
        x < width && y < height && track.is_drivable(x, y)
    });

    SensorTrace {
        origin,
        end,
        hit,
        reading: pixel_distance(origin, hit).min(range) / range,
    }
}
