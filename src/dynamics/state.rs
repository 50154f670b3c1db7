use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::geo::{spherical, Ecef, Geodetic};

// ---------------------------------------------------------------------------
// Descent state: time, ECEF position, local ENU velocity
// ---------------------------------------------------------------------------

/// Integrator state for one descent.
///
/// Position is Earth-centered (spherical model), velocity is in a local
/// East-North-Up frame that is never rotated as the body drifts. That is fine
/// for regional falls at moderate latitudes; long drifts or near-polar
/// releases accumulate heading error.
#[derive(Debug, Clone, PartialEq)]
pub struct SimState {
    pub time: f64,           // s since release
    pub pos: Vector3<f64>,   // m, ECEF
    pub vel: Vector3<f64>,   // m/s [East, North, Up]
}

impl SimState {
    /// State at the release point, time zero.
    pub fn at_release(release: &Release) -> Self {
        SimState {
            time: 0.0,
            pos: spherical::to_ecef(&release.position).to_vector(),
            vel: release.velocity,
        }
    }

    /// Current geodetic fix (spherical model).
    pub fn geodetic(&self) -> Geodetic {
        spherical::from_ecef(&Ecef::from(self.pos))
    }
}

// ---------------------------------------------------------------------------
// Initial conditions
// ---------------------------------------------------------------------------

/// Where and how the payload starts falling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Release {
    pub position: Geodetic,
    pub velocity: Vector3<f64>, // m/s [East, North, Up]
}

impl Release {
    /// Released from rest.
    pub fn at(position: Geodetic) -> Self {
        Self {
            position,
            velocity: Vector3::zeros(),
        }
    }

    pub fn with_velocity(mut self, velocity: Vector3<f64>) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn validate(&self) -> Result<(), SimError> {
        let p = &self.position;
        if !(p.lat.is_finite() && p.lon.is_finite() && p.alt.is_finite()) {
            return Err(SimError::invalid(
                "release position",
                format!("must be finite, got ({}, {}, {})", p.lat, p.lon, p.alt),
            ));
        }
        if !(-90.0..=90.0).contains(&p.lat) {
            return Err(SimError::invalid(
                "release latitude",
                format!("must lie in [-90, 90], got {}", p.lat),
            ));
        }
        if !self.velocity.iter().all(|v| v.is_finite()) {
            return Err(SimError::invalid("release velocity", "must be finite"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Payload definition
// ---------------------------------------------------------------------------

/// Mass and drag properties of the falling payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Airframe {
    pub mass: f64, // kg
    pub cd: f64,   // drag coefficient (dimensionless)
    pub area: f64, // reference area, m^2
}

impl Default for Airframe {
    fn default() -> Self {
        Self {
            mass: 1.0,
            cd: 1.0,
            area: 0.3,
        }
    }
}

impl Airframe {
    /// Speed at which drag balances gravity at a given air density.
    pub fn terminal_velocity(&self, density: f64, g: f64) -> f64 {
        let k = 0.5 * density * self.cd * self.area;
        if k > 0.0 {
            (self.mass * g / k).sqrt()
        } else {
            f64::INFINITY
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(SimError::invalid(
                "mass",
                format!("must be positive, got {}", self.mass),
            ));
        }
        if !(self.cd.is_finite() && self.cd >= 0.0) {
            return Err(SimError::invalid(
                "drag coefficient",
                format!("must be non-negative, got {}", self.cd),
            ));
        }
        if !(self.area.is_finite() && self.area >= 0.0) {
            return Err(SimError::invalid(
                "area",
                format!("must be non-negative, got {}", self.area),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub dt: f64,       // integration timestep, s
    pub max_time: f64, // hard stop, s
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 1.0,
            max_time: 36_000.0, // 10 h
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(SimError::invalid(
                "dt",
                format!("must be positive, got {}", self.dt),
            ));
        }
        if !(self.max_time.is_finite() && self.max_time >= 0.0) {
            return Err(SimError::invalid(
                "max_time",
                format!("must be non-negative, got {}", self.max_time),
            ));
        }
        Ok(())
    }

    /// Upper bound on the number of integration steps.
    pub fn max_steps(&self) -> usize {
        (self.max_time / self.dt).ceil() as usize
    }
}
