//! Color classification and connected-component labeling for track images.
//!
//! Colors are classified in HSV space using 8-bit conventions: hue in
//! `0..=180`, saturation and value in `0..=255`.

use image::RgbImage;
use ndarray::Array2;

/// A pixel color in 8-bit HSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv {
    /// Hue, `0..=180` (degrees halved).
    pub h: u8,
    /// Saturation, `0..=255`.
    pub s: u8,
    /// Value, `0..=255`.
    pub v: u8,
}

impl Hsv {
    /// Converts an RGB pixel to 8-bit HSV.
    pub fn from_rgb([r, g, b]: [u8; 3]) -> Self {
        let (r, g, b) = (f32::from(r), f32::from(g), f32::from(b));
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let s = if max > 0.0 { delta * 255.0 / max } else { 0.0 };

        let mut h = if delta <= 0.0 {
            0.0
        } else if max == r {
            60.0 * (g - b) / delta
        } else if max == g {
            120.0 + 60.0 * (b - r) / delta
        } else {
            240.0 + 60.0 * (r - g) / delta
        };
        if h < 0.0 {
            h += 360.0;
        }

        Self {
            h: (h / 2.0).round() as u8,
            s: s.round() as u8,
            v: max as u8,
        }
    }

    /// Red start marker.
    pub fn is_start_marker(self) -> bool {
        (self.h <= 10 || (170..=180).contains(&self.h)) && self.s >= 70 && self.v >= 50
    }

    /// Green waypoint marker.
    pub fn is_waypoint_marker(self) -> bool {
        (36..=70).contains(&self.h) && self.s >= 25 && self.v >= 25
    }

    /// Dark, unsaturated pixels are walls; everything else can be driven on.
    pub fn is_wall(self) -> bool {
        self.s <= 55 && self.v <= 150
    }
}

/// Per-pixel masks derived from a track image, indexed `[y, x]`.
#[derive(Debug, Clone)]
pub struct Masks {
    /// Start marker pixels.
    pub start: Array2<bool>,
    /// Waypoint marker pixels.
    pub waypoints: Array2<bool>,
    /// Drivable pixels.
    pub drivable: Array2<bool>,
}

/// Classifies every pixel of `image`.
pub fn classify(image: &RgbImage) -> Masks {
    let shape = (image.height() as usize, image.width() as usize);
    let mut masks = Masks {
        start: Array2::from_elem(shape, false),
        waypoints: Array2::from_elem(shape, false),
        drivable: Array2::from_elem(shape, false),
    };

    for (x, y, pixel) in image.enumerate_pixels() {
        let hsv = Hsv::from_rgb(pixel.0);
        let idx = [y as usize, x as usize];
        masks.start[idx] = hsv.is_start_marker();
        masks.waypoints[idx] = hsv.is_waypoint_marker();
        masks.drivable[idx] = !hsv.is_wall();
    }

    masks
}

/// A connected region of set pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Component {
    /// Leftmost column.
    pub min_x: usize,
    /// Topmost row.
    pub min_y: usize,
    /// Rightmost column.
    pub max_x: usize,
    /// Bottom row.
    pub max_y: usize,
    /// Number of pixels in the region.
    pub area: usize,
}

impl Component {
    /// Center of the bounding box.
    pub fn center(&self) -> (f32, f32) {
        let width = (self.max_x - self.min_x + 1) as f32;
        let height = (self.max_y - self.min_y + 1) as f32;
        (
            self.min_x as f32 + width / 2.0,
            self.min_y as f32 + height / 2.0,
        )
    }
}

/// Labels 8-connected regions of `mask`, in row-major order of their first pixel.
pub fn connected_components(mask: &Array2<bool>) -> Vec<Component> {
    let (rows, cols) = mask.dim();
    let mut visited = Array2::from_elem((rows, cols), false);
    let mut components = Vec::new();
    let mut stack = Vec::new();

    for ((y, x), &set) in mask.indexed_iter() {
        if !set || visited[[y, x]] {
            continue;
        }

        let mut component = Component {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
            area: 0,
        };
        visited[[y, x]] = true;
        stack.push((y, x));

        while let Some((cy, cx)) = stack.pop() {
            component.area += 1;
            component.min_x = component.min_x.min(cx);
            component.max_x = component.max_x.max(cx);
            component.min_y = component.min_y.min(cy);
            component.max_y = component.max_y.max(cy);

            for ny in cy.saturating_sub(1)..=(cy + 1).min(rows - 1) {
                for nx in cx.saturating_sub(1)..=(cx + 1).min(cols - 1) {
                    if mask[[ny, nx]] && !visited[[ny, nx]] {
                        visited[[ny, nx]] = true;
                        stack.push((ny, nx));
                    }
                }
            }
        }

        components.push(component);
    }

    components
}
