//! Waypoint progress scoring and fitness ranking.

use super::super::geometric_utils::distance;
use super::super::vehicle::Vehicle;
use super::Track;

impl Track {
    /// Fraction `[0, 1]` of the way from the previous anchor to the vehicle's next waypoint.
    ///
    /// The anchor is the start position for the first waypoint and the previous
    /// waypoint afterwards. Returns 1 once the vehicle is inside the waypoint's
    /// capture radius, when every waypoint is captured, or when the track has
    /// no waypoints at all.
    pub fn waypoint_completion(&self, vehicle: &Vehicle) -> f32 {
        if self.waypoints.is_empty() {
            return 1.0;
        }

        let index = vehicle.waypoint_index;
        if index >= self.waypoints.len() {
            return 1.0;
        }

        let target = &self.waypoints[index];
        let anchor = if index == 0 {
            self.start
        } else {
            self.waypoints[index - 1].pos
        };

        let current = distance(vehicle.pos, target.pos);
        if current < target.radius {
            return 1.0;
        }

        let total = distance(anchor, target.pos);
        if total <= f32::EPSILON {
            return 0.0;
        }

        ((total - current) / total).clamp(0.0, 1.0)
    }

    /// Advances the vehicle's waypoint counters from its current position.
    ///
    /// Capturing a waypoint credits one waypoint share to the track completion;
    /// capturing the last one pins it at exactly 1. Otherwise the partial
    /// progress towards the next waypoint is stored, scaled by the share.
    pub fn update_distance_to_next_waypoint(&self, vehicle: &mut Vehicle) {
        let completion = self.waypoint_completion(vehicle);

        if completion >= 1.0 {
            vehicle.waypoint_index += 1;
            vehicle.current_waypoint_completion = 0.0;

            if vehicle.waypoint_index < self.waypoints.len() {
                vehicle.track_completion += self.per_waypoint_share;
            } else {
                vehicle.waypoint_index = self.waypoints.len();
                vehicle.track_completion = 1.0;
            }
        } else {
            vehicle.current_waypoint_completion = completion * self.per_waypoint_share;
        }
    }
}

/// Picks the best and second-best vehicles by [`Vehicle::completion`].
///
/// Returns indices into `vehicles`. Ties go to the first vehicle encountered.
/// The second-best is the highest-scoring vehicle other than the best.
pub fn best_cars(vehicles: &[Vehicle]) -> (Option<usize>, Option<usize>) {
    let mut best: Option<usize> = None;
    for (i, vehicle) in vehicles.iter().enumerate() {
        match best {
            Some(b) if vehicle.completion() <= vehicles[b].completion() => {}
            _ => best = Some(i),
        }
    }

    let Some(best) = best else {
        return (None, None);
    };
    let best_completion = vehicles[best].completion();

    let mut second: Option<usize> = None;
    for (i, vehicle) in vehicles.iter().enumerate() {
        if i == best {
            continue;
        }
        match second {
            None => second = Some(i),
            Some(s)
                if vehicle.completion() > vehicles[s].completion()
                    && vehicle.completion() <= best_completion =>
            {
                second = Some(i);
            }
            Some(_) => {}
        }
    }

    (Some(best), second)
}

/// True when no vehicle is alive.
pub fn all_done(vehicles: &[Vehicle]) -> bool {
    vehicles.iter().all(|vehicle| !vehicle.alive)
}
