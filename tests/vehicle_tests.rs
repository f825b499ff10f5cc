#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use carsim::simulation::brain::Brain;
use carsim::simulation::params::Params;
use carsim::simulation::track::Track;
use carsim::simulation::vehicle::Vehicle;
use geo::Point;
use ndarray::{Array1, Array2};
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn open_track(width: usize, height: usize) -> Track {
    Track::new(
        Array2::from_elem((height, width), true),
        Point::new(width as f32 / 2.0, height as f32 / 2.0),
        Vec::new(),
    )
}

fn vehicle_at(x: f32, y: f32, params: &Params) -> Vehicle {
    let mut vehicle = Vehicle::new(0, 0.0, params, &mut SmallRng::seed_from_u64(0)).unwrap();
    vehicle.set_pos(Point::new(x, y));
    vehicle
}

#[test]
fn test_collision_kills_without_moving() {
    let params = Params::default();
    let mut vehicle = vehicle_at(50.0, 50.0, &params);
    vehicle.speed = 1.0;
    vehicle.sensors = Array1::from_vec(vec![1.0, 1.0, 0.01, 1.0, 1.0]);
    vehicle.set_throttle(0.7);
    vehicle.set_turn_ratio(0.3);

    vehicle.update(0.1, &params);

    assert!(!vehicle.alive);
    assert_eq!(vehicle.pos, Point::new(50.0, 50.0));
    assert_eq!(vehicle.speed, 1.0);
    assert_eq!(vehicle.heading, 0.0);
    assert_eq!(vehicle.throttle, 0.7);
    assert_eq!(vehicle.odometer, 0.0);
}

#[test]
fn test_reading_at_threshold_is_not_a_collision() {
    let params = Params::default();
    let mut vehicle = vehicle_at(50.0, 50.0, &params);
    vehicle.sensors = Array1::from_elem(5, params.collision_distance);

    assert!(!vehicle.collision(&params));
    vehicle.update(0.1, &params);
    assert!(vehicle.alive);
}

#[test]
fn test_throttle_accelerates_forward() {
    let params = Params::default();
    let mut vehicle = vehicle_at(0.0, 0.0, &params);
    vehicle.set_throttle(1.0);

    vehicle.update(0.1, &params);

    // 1.0 * 8.0 * 0.1
    assert!((vehicle.speed - 0.8).abs() < 1e-6);
    // heading 0 drives along +y
    assert!(vehicle.pos.x().abs() < 1e-5);
    assert!((vehicle.pos.y() - 0.8).abs() < 1e-5);
    assert!((vehicle.odometer - 0.8).abs() < 1e-5);
}

#[test]
fn test_throttle_is_clamped() {
    let params = Params::default();
    let mut vehicle = vehicle_at(0.0, 0.0, &params);
    vehicle.set_throttle(5.0);

    vehicle.update(0.1, &params);

    assert_eq!(vehicle.throttle, params.throttle_max);
    assert!((vehicle.speed - 0.8).abs() < 1e-6);
}

#[test]
fn test_speed_is_capped() {
    let params = Params::default();
    let mut vehicle = vehicle_at(0.0, 0.0, &params);
    vehicle.set_throttle(1.0);

    vehicle.update(1.0, &params);

    assert_eq!(vehicle.speed, params.speed_max);
}

#[test]
fn test_no_reverse_motion() {
    let params = Params::default();
    let mut vehicle = vehicle_at(10.0, 10.0, &params);
    vehicle.set_throttle(-1.0);

    vehicle.update(0.5, &params);

    assert_eq!(vehicle.speed, 0.0);
    assert_eq!(vehicle.pos, Point::new(10.0, 10.0));
    assert_eq!(vehicle.odometer, 0.0);
}

#[test]
fn test_engine_brake_decays_without_overshoot() {
    let params = Params::default();
    let mut vehicle = vehicle_at(0.0, 0.0, &params);
    vehicle.speed = 1.0;

    vehicle.update(0.1, &params);
    // 1.0 - 2.0 * 0.1
    assert!((vehicle.speed - 0.8).abs() < 1e-6);

    vehicle.update(10.0, &params);
    assert_eq!(vehicle.speed, 0.0);
}

#[test]
fn test_turn_integrates_heading() {
    let params = Params::default();
    let mut vehicle = vehicle_at(0.0, 0.0, &params);
    vehicle.set_turn_ratio(0.5);

    vehicle.update(0.1, &params);

    // 0.5 * 4.0 * 0.1
    assert!((vehicle.heading - 0.2).abs() < 1e-6);
}

#[test]
fn test_paused_vehicle_does_not_move() {
    let params = Params::default();
    let mut vehicle = vehicle_at(0.0, 0.0, &params);
    vehicle.pause(0.0);
    vehicle.set_throttle(1.0);

    vehicle.update(0.5, &params);

    assert!(vehicle.alive);
    assert_eq!(vehicle.speed, 0.0);
    assert_eq!(vehicle.pos, Point::new(0.0, 0.0));
}

#[test]
fn test_first_clocked_update_uses_zero_step() {
    let params = Params::default();
    let mut vehicle = vehicle_at(0.0, 0.0, &params);
    vehicle.set_throttle(1.0);

    vehicle.update_at(5.0, &params);
    assert_eq!(vehicle.speed, 0.0);

    vehicle.update_at(5.1, &params);
    assert!((vehicle.speed - 0.8).abs() < 1e-4);
}

#[test]
fn test_stuck_timeout_kills() {
    let params = Params::default();
    let mut vehicle = vehicle_at(0.0, 0.0, &params);

    vehicle.check_for_stuck(19.0, &params);
    assert!(vehicle.alive);

    vehicle.check_for_stuck(20.5, &params);
    assert!(!vehicle.alive);
}

#[test]
fn test_progress_rearms_stuck_timer() {
    let params = Params::default();
    let mut vehicle = vehicle_at(0.0, 0.0, &params);

    vehicle.track_completion = 0.25;
    vehicle.check_for_stuck(10.0, &params);
    assert_eq!(vehicle.stuck_deadline, 30.0);
    assert_eq!(vehicle.best_track_completion, 0.25);

    vehicle.check_for_stuck(25.0, &params);
    assert!(vehicle.alive);
    vehicle.check_for_stuck(30.5, &params);
    assert!(!vehicle.alive);
}

#[test]
fn test_pause_shifts_stuck_deadline() {
    let params = Params::default();
    let mut vehicle = vehicle_at(0.0, 0.0, &params);

    vehicle.pause(5.0);
    // frozen while paused
    vehicle.check_for_stuck(100.0, &params);
    assert!(vehicle.alive);
    assert_eq!(vehicle.remaining_time(100.0), 15);

    vehicle.resume(15.0);
    assert_eq!(vehicle.stuck_deadline, 30.0);

    vehicle.check_for_stuck(29.0, &params);
    assert!(vehicle.alive);
    vehicle.check_for_stuck(30.5, &params);
    assert!(!vehicle.alive);
    assert_eq!(vehicle.remaining_time(31.0), 0);
}

#[test]
fn test_sensor_readings_are_normalized() {
    let params = Params::default();
    let track = open_track(120, 80);

    for step in 0..16 {
        let mut vehicle = vehicle_at(60.0, 40.0, &params);
        vehicle.heading = step as f32 * std::f32::consts::PI / 8.0;
        vehicle.sense(&track, &params);

        assert_eq!(vehicle.sensors.len(), params.sensor_count);
        assert!(vehicle.sensors.iter().all(|&r| (0.0..=1.0).contains(&r)));
    }
}

#[test]
fn test_clear_rays_read_one() {
    let params = Params::default();
    let track = open_track(800, 800);
    let mut vehicle = vehicle_at(400.0, 400.0, &params);

    vehicle.sense(&track, &params);

    assert!(vehicle.sensors.iter().all(|&r| r > 0.98 && r <= 1.0));
    assert_eq!(vehicle.traces.len(), 5);
    assert!(vehicle.traces.iter().all(|t| t.hit == t.end));
}

#[test]
fn test_wall_ahead_shortens_center_ray() {
    let params = Params::default();
    let mut mask = Array2::from_elem((400, 200), true);
    for y in 155..400 {
        for x in 0..200 {
            mask[[y, x]] = false;
        }
    }
    let track = Track::new(mask, Point::new(100.0, 100.0), Vec::new());
    let mut vehicle = vehicle_at(100.0, 100.0, &params);

    vehicle.sense(&track, &params);

    // sensor origin is 5 px ahead of the center, wall starts 50 px further
    assert!((vehicle.sensors[2] - 50.0 / 300.0).abs() < 0.01);
    assert_eq!(vehicle.traces[2].hit.1, 155);
}

#[test]
fn test_out_of_bounds_is_a_wall() {
    let params = Params::default();
    let track = open_track(100, 100);
    let mut vehicle = vehicle_at(50.0, 50.0, &params);
    vehicle.set_sensor_bounds((100, 60));

    vehicle.sense(&track, &params);

    // forward ray leaves the 60 px tall sensor area
    assert!((vehicle.sensors[2] - 5.0 / 300.0).abs() < 0.005);
    assert!(vehicle.collision(&params));
}

#[test]
fn test_dead_vehicle_does_not_sense() {
    let params = Params::default();
    let track = open_track(100, 100);
    let mut vehicle = vehicle_at(50.0, 50.0, &params);
    vehicle.alive = false;

    vehicle.sense(&track, &params);

    assert!(vehicle.traces.is_empty());
    assert!(vehicle.sensors.iter().all(|&r| r == 1.0));
}

#[test]
fn test_autopilot_centers_turn_output() {
    let params = Params::default();
    let mut vehicle = vehicle_at(0.0, 0.0, &params);
    vehicle.brain = Brain::new(&params.layer_sizes).unwrap();

    vehicle.autopilot().unwrap();
    vehicle.apply();

    assert!((vehicle.throttle - 0.5).abs() < 1e-6);
    assert!(vehicle.turn_ratio.abs() < 1e-6);
}

#[test]
fn test_genotype_replaces_controller() {
    let params = Params::default();
    let mut vehicle = vehicle_at(0.0, 0.0, &params);
    let genes: Vec<f32> = (0..47).map(|i| i as f32 / 47.0).collect();

    vehicle.set_genotype(&genes).unwrap();

    assert_eq!(vehicle.genotype(), genes);
    assert!(vehicle.set_genotype(&genes[..10]).is_err());
}

#[test]
fn test_outline_follows_heading() {
    let params = Params::default();
    let mut vehicle = vehicle_at(10.0, 10.0, &params);

    let corners = vehicle.outline(&params);
    assert_eq!(corners[0], Point::new(5.0, 20.0));
    assert_eq!(corners[2], Point::new(15.0, 0.0));

    vehicle.heading = std::f32::consts::FRAC_PI_2;
    let corners = vehicle.outline(&params);
    // (-5, 10) rotated a quarter turn is (-10, -5)
    assert!(corners[0].x().abs() < 1e-4);
    assert!((corners[0].y() - 5.0).abs() < 1e-4);
}

#[test]
fn test_reset_clears_progress() {
    let params = Params::default();
    let mut vehicle = vehicle_at(0.0, 0.0, &params);
    vehicle.alive = false;
    vehicle.track_completion = 0.5;
    vehicle.waypoint_index = 2;
    vehicle.odometer = 12.0;

    vehicle.reset(40.0, &params);

    assert!(vehicle.alive);
    assert_eq!(vehicle.completion(), 0.0);
    assert_eq!(vehicle.waypoint_index, 0);
    assert_eq!(vehicle.odometer, 0.0);
    assert_eq!(vehicle.stuck_deadline, 60.0);
}

#[test]
fn test_status_lists_readings() {
    let params = Params::default();
    let vehicle = vehicle_at(12.0, 34.0, &params);

    let text = vehicle.status(0.0, &params).to_string();

    assert!(text.contains("POS=(12, 34)"));
    assert!(text.contains("WPI=0"));
    assert!(text.contains("S=[ 1.00 1.00 1.00 1.00 1.00 ] C=0"));
    assert!(text.contains("M=20"));
}
