use nalgebra::{Vector2, Vector3};

use crate::physics::{drag_accel, gravity_accel};

pub mod state;

// ---------------------------------------------------------------------------
// Equations of motion (3DOF point mass, local ENU frame)
// ---------------------------------------------------------------------------

/// Velocity of the payload relative to the surrounding air.
///
/// Wind is horizontal only; the vertical component passes through unchanged.
pub fn airspeed_vector(vel: &Vector3<f64>, wind: &Vector2<f64>) -> Vector3<f64> {
    vel - Vector3::new(wind.x, wind.y, 0.0)
}

/// Net acceleration on the payload.
///
/// Forces modeled:
///   1. Drag: quadratic, opposing the airspeed vector, exponential density
///   2. Gravity: constant, local down
pub fn acceleration(
    vel: &Vector3<f64>,
    altitude: f64,
    wind: &Vector2<f64>,
    airframe: &state::Airframe,
) -> Vector3<f64> {
    let a_drag = drag_accel(&airspeed_vector(vel, wind), altitude, airframe);
    a_drag + gravity_accel()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
