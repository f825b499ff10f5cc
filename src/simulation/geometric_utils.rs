//! Geometric utility functions for distance calculations and line tracing.

use geo::algorithm::Distance;
use geo::{Euclidean, Point};

/// Rotates `(x, y)` around the origin by `angle` radians.
#[inline]
pub fn rotate(x: f32, y: f32, angle: f32) -> (f32, f32) {
    let (sin, cos) = angle.sin_cos();
    (x * cos - y * sin, x * sin + y * cos)
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Point<f32>, b: Point<f32>) -> f32 {
    Euclidean.distance(a, b)
}

/// Euclidean distance between two pixel coordinates.
#[inline]
pub fn pixel_distance(a: (i32, i32), b: (i32, i32)) -> f32 {
    distance(
        Point::new(a.0 as f32, a.1 as f32),
        Point::new(b.0 as f32, b.1 as f32),
    )
}

/// Traces an integer line from `start` towards `end`.
///
/// Uses Bresenham stepping. The start pixel itself is never tested; every
/// following pixel is passed to `is_clear` and the first one that is not clear
/// is returned. If the whole line is clear, `end` is returned.
pub fn trace_line(
    start: (i32, i32),
    end: (i32, i32),
    mut is_clear: impl FnMut(i32, i32) -> bool,
) -> (i32, i32) {
    let (mut x, mut y) = start;
    let (x2, y2) = end;

    let dx = (x2 - x).abs();
    let dy = (y2 - y).abs();
    let sx = if x < x2 { 1 } else { -1 };
    let sy = if y < y2 { 1 } else { -1 };

    let mut err = (if dx > dy { dx } else { -dy }) / 2;

    while x != x2 || y != y2 {
        let e2 = err;
        if e2 > -dx {
            err -= dy;
            x += sx;
        }
        if e2 < dy {
            err += dx;
            y += sy;
        }

        if !is_clear(x, y) {
            return (x, y);
        }
    }

    end
}
