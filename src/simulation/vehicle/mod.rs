//! Vehicle module containing kinematics, sensors and lifecycle.

mod sensors;
mod status;
mod vehicle;

pub use sensors::{SensorTrace, cast_ray, sensor_angles};
pub use status::VehicleStatus;
pub use vehicle::*;
