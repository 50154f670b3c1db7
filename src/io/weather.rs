//! Weather document decoding.
//!
//! Reads the `current` block of an Open-Meteo style forecast response. Only
//! surface wind speed and direction are used; everything else in the
//! document is ignored.

use serde::Deserialize;

use crate::error::DataError;
use crate::physics::{SpeedUnit, WeatherObservation};

#[derive(Debug, Deserialize)]
struct Document {
    current: Option<Current>,
    current_units: Option<CurrentUnits>,
}

#[derive(Debug, Deserialize)]
struct Current {
    wind_speed_10m: Option<f64>,
    wind_direction_10m: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CurrentUnits {
    wind_speed_10m: Option<String>,
}

/// Parse a wind speed unit label as the provider spells it.
pub fn parse_unit(label: &str) -> Result<SpeedUnit, DataError> {
    match label.trim().to_ascii_lowercase().as_str() {
        "mph" => Ok(SpeedUnit::Mph),
        "m/s" | "ms" => Ok(SpeedUnit::MetersPerSecond),
        "km/h" | "kmh" => Ok(SpeedUnit::KilometersPerHour),
        "kn" | "kt" | "knots" => Ok(SpeedUnit::Knots),
        _ => Err(DataError::UnknownUnit(label.to_string())),
    }
}

/// Decode the current surface wind from a forecast document.
///
/// Without a `current_units` block the speed is taken to be in mph, the
/// unit the provider is queried with.
pub fn decode(text: &str) -> Result<WeatherObservation, DataError> {
    let doc: Document = serde_json::from_str(text)?;
    let current = doc.current.ok_or(DataError::MissingField("current"))?;

    let wind_speed = current
        .wind_speed_10m
        .ok_or(DataError::MissingField("current.wind_speed_10m"))?;
    let wind_bearing = current
        .wind_direction_10m
        .ok_or(DataError::MissingField("current.wind_direction_10m"))?;

    let unit = match doc.current_units.and_then(|u| u.wind_speed_10m) {
        Some(label) => parse_unit(&label)?,
        None => SpeedUnit::Mph,
    };

    Ok(WeatherObservation {
        wind_speed,
        wind_bearing,
        unit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "metadata": {"latitude": 40.0, "longitude": -105.0, "elevation": 1600.0},
        "current": {
            "time": 1718000000,
            "temperature_2m": 71.2,
            "wind_speed_10m": 2.1,
            "wind_direction_10m": 288.0,
            "wind_gusts_10m": 5.4
        },
        "hourly": {"temperature_2m": [70.1, 71.0]}
    }"#;

    #[test]
    fn reads_current_wind_in_mph() {
        let obs = decode(RESPONSE).unwrap();
        assert_eq!(obs, WeatherObservation::mph(2.1, 288.0));
    }

    #[test]
    fn honors_unit_block() {
        let text = r#"{
            "current_units": {"wind_speed_10m": "km/h"},
            "current": {"wind_speed_10m": 18.0, "wind_direction_10m": 90.0}
        }"#;
        let obs = decode(text).unwrap();
        assert_eq!(obs.unit, SpeedUnit::KilometersPerHour);
        assert!((obs.speed_mps() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn missing_wind_is_reported() {
        let err = decode(r#"{"current": {"wind_speed_10m": 3.0}}"#).unwrap_err();
        assert!(matches!(err, DataError::MissingField("current.wind_direction_10m")));
        let err = decode(r#"{"hourly": {}}"#).unwrap_err();
        assert!(matches!(err, DataError::MissingField("current")));
    }

    #[test]
    fn unknown_unit_is_rejected() {
        assert!(matches!(parse_unit("furlongs/fortnight"), Err(DataError::UnknownUnit(_))));
        assert_eq!(parse_unit(" MPH ").unwrap(), SpeedUnit::Mph);
        assert_eq!(parse_unit("kn").unwrap(), SpeedUnit::Knots);
    }
}
