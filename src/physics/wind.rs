use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

// ---------------------------------------------------------------------------
// Weather snapshot
// ---------------------------------------------------------------------------

/// Unit of a reported wind speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedUnit {
    #[default]
    Mph,
    MetersPerSecond,
    KilometersPerHour,
    Knots,
}

impl SpeedUnit {
    /// Multiply a speed in this unit by this factor to get m/s.
    pub fn to_mps(self) -> f64 {
        match self {
            SpeedUnit::Mph => 0.447_04,
            SpeedUnit::MetersPerSecond => 1.0,
            SpeedUnit::KilometersPerHour => 1.0 / 3.6,
            SpeedUnit::Knots => 0.514_444,
        }
    }
}

/// A single surface wind report.
///
/// The same report is applied at every altitude of a descent: one weather
/// lookup per simulation, not one per layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub wind_speed: f64,
    /// Degrees clockwise from north the wind blows FROM.
    pub wind_bearing: f64,
    #[serde(default)]
    pub unit: SpeedUnit,
}

impl WeatherObservation {
    /// Report in mph, the unit the weather provider is queried with.
    pub fn mph(wind_speed: f64, wind_bearing: f64) -> Self {
        Self {
            wind_speed,
            wind_bearing,
            unit: SpeedUnit::Mph,
        }
    }

    pub fn speed_mps(&self) -> f64 {
        self.wind_speed * self.unit.to_mps()
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !self.wind_speed.is_finite() {
            return Err(SimError::invalid(
                "wind speed",
                format!("must be finite, got {}", self.wind_speed),
            ));
        }
        if !self.wind_bearing.is_finite() {
            return Err(SimError::invalid(
                "wind bearing",
                format!("must be finite, got {}", self.wind_bearing),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Wind vector
// ---------------------------------------------------------------------------

/// Horizontal wind velocity (east, north) in m/s.
///
/// The compass bearing is turned into a math angle with theta = 270° - bearing,
/// which also flips "from" into "towards": a westerly (270°) blows east.
pub fn wind_vector(obs: &WeatherObservation) -> Vector2<f64> {
    let speed = obs.speed_mps();
    let theta = (270.0 - obs.wind_bearing).to_radians();
    Vector2::new(speed * theta.cos(), speed * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn westerly_blows_east() {
        let w = wind_vector(&WeatherObservation::mph(10.0, 270.0));
        assert_abs_diff_eq!(w.x, 4.4704, epsilon = 1e-12);
        assert_abs_diff_eq!(w.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn northerly_blows_south() {
        let w = wind_vector(&WeatherObservation::mph(10.0, 0.0));
        assert_abs_diff_eq!(w.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(w.y, -4.4704, epsilon = 1e-12);
    }

    #[test]
    fn southeasterly_blows_northwest() {
        let w = wind_vector(&WeatherObservation::mph(20.0, 135.0));
        assert!(w.x < 0.0);
        assert!(w.y > 0.0);
        assert_abs_diff_eq!(w.norm(), 20.0 * 0.447_04, epsilon = 1e-12);
    }

    #[test]
    fn calm_is_zero() {
        let w = wind_vector(&WeatherObservation::mph(0.0, 123.0));
        assert_eq!(w.norm(), 0.0);
    }

    #[test]
    fn unit_conversion() {
        let obs = WeatherObservation {
            wind_speed: 36.0,
            wind_bearing: 270.0,
            unit: SpeedUnit::KilometersPerHour,
        };
        assert_abs_diff_eq!(wind_vector(&obs).x, 10.0, epsilon = 1e-12);
        assert_eq!(SpeedUnit::MetersPerSecond.to_mps(), 1.0);
    }

    #[test]
    fn non_finite_reports_rejected() {
        assert!(WeatherObservation::mph(12.0, 250.0).validate().is_ok());
        assert!(WeatherObservation::mph(0.0, 0.0).validate().is_ok());
        assert!(matches!(
            WeatherObservation::mph(f64::NAN, 270.0).validate(),
            Err(SimError::InvalidParameter { name: "wind speed", .. })
        ));
        assert!(WeatherObservation::mph(f64::INFINITY, 270.0).validate().is_err());
        assert!(matches!(
            WeatherObservation::mph(10.0, f64::NEG_INFINITY).validate(),
            Err(SimError::InvalidParameter { name: "wind bearing", .. })
        ));
    }
}
