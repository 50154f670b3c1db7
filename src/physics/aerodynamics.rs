use nalgebra::Vector3;

use crate::dynamics::state::Airframe;
use crate::physics::atmosphere::air_density;

/// Below this airspeed the drag direction is numerically meaningless.
pub const MIN_AIRSPEED: f64 = 1e-6; // m/s

/// Quadratic drag force opposing `vel`: 0.5 * rho * |v|^2 * cd * area.
pub fn drag_force(vel: &Vector3<f64>, density: f64, cd: f64, area: f64) -> Vector3<f64> {
    let speed = vel.norm();
    if speed < MIN_AIRSPEED {
        return Vector3::zeros();
    }
    let q_dyn = 0.5 * density * speed * speed;
    -vel / speed * (q_dyn * cd * area)
}

/// Drag acceleration on `airframe` moving at `rel_vel` relative to the air.
///
/// Returns exactly zero when the airspeed is below [`MIN_AIRSPEED`]. A body
/// drifting with the wind therefore feels no drag at all until gravity has
/// built up some relative velocity.
pub fn drag_accel(rel_vel: &Vector3<f64>, altitude_m: f64, airframe: &Airframe) -> Vector3<f64> {
    drag_force(rel_vel, air_density(altitude_m), airframe.cd, airframe.area) / airframe.mass
}
