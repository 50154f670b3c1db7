//! High-altitude balloon landing estimation.
//!
//! Given a release point (usually a feed fix in ECEF, converted through the
//! WGS84 ellipsoid) and a single surface wind report, integrates the payload's
//! fall under gravity and exponential-atmosphere drag until it reaches the
//! ground, then reports the impact latitude/longitude.
//!
//! ```no_run
//! use balloon_landfall::geo::{wgs84, Ecef};
//! use balloon_landfall::physics::WeatherObservation;
//! use balloon_landfall::sim::simulate_fall;
//! use balloon_landfall::types::{Airframe, Release, SimConfig};
//!
//! let feed_fix = Ecef::new(-1_288_000.0, -4_720_000.0, 4_080_000.0);
//! let fix = wgs84::from_ecef(&feed_fix, wgs84::DEFAULT_TOLERANCE)?;
//! let wind = WeatherObservation::mph(12.0, 250.0);
//! let release = Release::at(fix);
//! let impact = simulate_fall(&release, &Airframe::default(), Some(&wind), &SimConfig::default())?;
//! println!("{:?} at {:?}", impact.status, impact.lat_lon());
//! # Ok::<(), balloon_landfall::SimError>(())
//! ```

pub mod config;
pub mod dynamics;
pub mod error;
pub mod geo;
pub mod io;
pub mod physics;
pub mod sim;

pub use error::{DataError, SimError};

pub mod types {
    pub use crate::dynamics::state::{Airframe, Release, SimConfig, SimState};
    pub use crate::geo::{Ecef, Geodetic, EARTH_RADIUS};
    pub use crate::physics::gravity::G;
}
