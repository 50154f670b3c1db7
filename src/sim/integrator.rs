use nalgebra::Vector2;

use crate::dynamics;
use crate::dynamics::state::{Airframe, SimState};
use crate::geo::{spherical, Geodetic};

/// Meters per degree of latitude (and of longitude at the equator).
pub const METERS_PER_DEG: f64 = 111_111.0;

/// Floor on cos(lat) when scaling east motion to longitude, so a release at a
/// pole still produces a finite step.
const MIN_COS_LAT: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Explicit (forward) Euler step
// ---------------------------------------------------------------------------

/// Advance a falling state by `dt`.
///
/// `fix` must be the geodetic form of `state.pos`; the runner already holds it
/// for the ground check. Velocity is updated first, then the new velocity moves
/// altitude directly and lat/lon through a flat-Earth meters-per-degree scale.
/// First-order: the discretization error grows linearly with `dt`.
pub fn euler_step(
    state: &SimState,
    fix: &Geodetic,
    wind: &Vector2<f64>,
    airframe: &Airframe,
    dt: f64,
) -> SimState {
    let accel = dynamics::acceleration(&state.vel, fix.alt, wind, airframe);
    let vel = state.vel + accel * dt;

    let meters_per_deg_lon = METERS_PER_DEG * fix.lat.to_radians().cos().max(MIN_COS_LAT);
    let next = Geodetic {
        lat: fix.lat + vel.y * dt / METERS_PER_DEG,
        lon: fix.lon + vel.x * dt / meters_per_deg_lon,
        alt: fix.alt + vel.z * dt,
    };

    SimState {
        time: state.time + dt,
        pos: spherical::to_ecef(&next).to_vector(),
        vel,
    }
}
