pub mod aerodynamics;
pub mod atmosphere;
pub mod gravity;
pub mod wind;

pub use aerodynamics::drag_accel;
pub use atmosphere::air_density;
pub use gravity::gravity_accel;
pub use wind::{wind_vector, SpeedUnit, WeatherObservation};
