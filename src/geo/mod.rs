//! Geodetic and Earth-centered Cartesian positions.
//!
//! Two conversion models live here and are deliberately kept apart:
//!
//! * [`spherical`]: a sphere of radius [`EARTH_RADIUS`]. Closed form in both
//!   directions, used by the integrator at every step.
//! * [`wgs84`]: the WGS84 ellipsoid with an iterative inverse, used once at
//!   the boundary to turn externally supplied ECEF fixes into geodetic form.
//!
//! Mixing the two on the same point shifts latitude by up to ~0.19° and
//! altitude by up to ~14 km, so a point converted with one model must be
//! converted back with the same model.

pub mod spherical;
pub mod wgs84;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the spherical model, m.
pub const EARTH_RADIUS: f64 = 6_371_000.0;

/// Latitude/longitude in degrees, altitude in meters above the reference surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geodetic {
    pub lat: f64, // deg
    pub lon: f64, // deg
    pub alt: f64, // m
}

impl Geodetic {
    pub fn new(lat: f64, lon: f64, alt: f64) -> Self {
        Self { lat, lon, alt }
    }
}

/// Earth-centered, Earth-fixed Cartesian coordinates (meters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ecef {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Ecef {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_vector(self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Distance from Earth's center.
    pub fn norm(self) -> f64 {
        self.to_vector().norm()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<Vector3<f64>> for Ecef {
    fn from(v: Vector3<f64>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<[f64; 3]> for Ecef {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}
