//! Track model: drivable raster, start position and ordered waypoints.
//!
//! A track is parsed once from a color-coded image:
//! - exactly one red region marks the start position,
//! - one or more green regions mark waypoints,
//! - dark unsaturated pixels are walls; everything else is drivable.
//!
//! Waypoints are ordered by descending `y`, which assumes the track runs from
//! the bottom of the image to the top. Looping or sideways tracks will get
//! their waypoints out of order.

use std::path::Path;

use geo::Point;
use image::RgbImage;
use ndarray::Array2;
use tracing::debug;

use super::error::TrackError;
use super::params::Params;

mod progress;
pub mod raster;
mod waypoint;

pub use progress::{all_done, best_cars};
pub use waypoint::Waypoint;

/// A parsed track.
#[derive(Debug, Clone)]
pub struct Track {
    /// Drivable pixels, indexed `[y, x]`.
    drivable: Array2<bool>,
    start: Point<f32>,
    waypoints: Vec<Waypoint>,
    per_waypoint_share: f32,
}

impl Track {
    /// Builds a track from an already classified mask.
    ///
    /// Waypoints are sorted by descending `y`; ties keep their given order.
    pub fn new(drivable: Array2<bool>, start: Point<f32>, mut waypoints: Vec<Waypoint>) -> Self {
        waypoints.sort_by(|a, b| b.pos.y().total_cmp(&a.pos.y()));
        let per_waypoint_share = if waypoints.is_empty() {
            0.0
        } else {
            1.0 / waypoints.len() as f32
        };

        Self {
            drivable,
            start,
            waypoints,
            per_waypoint_share,
        }
    }

    /// Loads and parses a track image from disk.
    pub fn load(path: impl AsRef<Path>, params: &Params) -> Result<Self, TrackError> {
        let path = path.as_ref();
        let image = image::open(path)?.to_rgb8();
        debug!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "decoded track image"
        );
        Self::from_image(&image, params)
    }

    /// Parses a track from an RGB image.
    pub fn from_image(image: &RgbImage, params: &Params) -> Result<Self, TrackError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(TrackError::EmptyImage);
        }

        let masks = raster::classify(image);

        let starts = raster::connected_components(&masks.start);
        let start = match starts.as_slice() {
            [] => return Err(TrackError::NoStart),
            [only] => {
                let (x, y) = only.center();
                Point::new(x, y)
            }
            many => return Err(TrackError::MultipleStarts(many.len())),
        };

        let waypoints: Vec<Waypoint> = raster::connected_components(&masks.waypoints)
            .iter()
            .map(|component| {
                let (x, y) = component.center();
                Waypoint::new(x, y, params.waypoint_radius)
            })
            .collect();
        if waypoints.is_empty() {
            return Err(TrackError::NoWaypoints);
        }

        let track = Self::new(masks.drivable, start, waypoints);
        debug!(
            start_x = start.x(),
            start_y = start.y(),
            waypoints = track.num_waypoints(),
            "parsed track"
        );
        Ok(track)
    }

    /// Start position of every vehicle.
    pub fn start(&self) -> Point<f32> {
        self.start
    }

    /// Width and height of the raster.
    pub fn bounds(&self) -> (u32, u32) {
        let (rows, cols) = self.drivable.dim();
        (cols as u32, rows as u32)
    }

    /// Waypoints in track order.
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Number of waypoints.
    pub fn num_waypoints(&self) -> usize {
        self.waypoints.len()
    }

    /// Track completion credited for each captured waypoint.
    pub fn per_waypoint_share(&self) -> f32 {
        self.per_waypoint_share
    }

    /// Whether the pixel at `(x, y)` can be driven on. Pixels outside the raster are walls.
    #[inline]
    pub fn is_drivable(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        self.drivable
            .get([y as usize, x as usize])
            .copied()
            .unwrap_or(false)
    }
}
