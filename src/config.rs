//! Persistent settings stored as RON.
//!
//! Every section is `#[serde(default)]`, so a settings file only needs the
//! values it changes and unknown keys from newer versions are ignored.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dynamics::state::{Airframe, SimConfig};
use crate::error::{DataError, SimError};
use crate::geo::{wgs84, Ecef, Geodetic};

/// Tuning for the iterative ECEF -> geodetic solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeodesyConfig {
    pub tolerance: f64, // rad
    pub max_iterations: usize,
}

impl Default for GeodesyConfig {
    fn default() -> Self {
        Self {
            tolerance: wgs84::DEFAULT_TOLERANCE,
            max_iterations: wgs84::DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl GeodesyConfig {
    /// Convert an externally supplied ECEF fix with these settings.
    pub fn to_geodetic(&self, p: &Ecef) -> Result<Geodetic, SimError> {
        wgs84::from_ecef_with(p, self.tolerance, self.max_iterations)
    }
}

/// Everything a landing estimate can be tuned with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub simulation: SimConfig,
    pub airframe: Airframe,
    pub geodesy: GeodesyConfig,
    /// Log filter (error, warn, info, debug, trace or an env-filter directive).
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            simulation: SimConfig::default(),
            airframe: Airframe::default(),
            geodesy: GeodesyConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a RON file.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let contents = std::fs::read_to_string(path).map_err(|source| DataError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let settings: Settings = ron::from_str(&contents)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings if the file exists, otherwise fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, DataError> {
        match path {
            Some(path) if path.exists() => Self::load(path),
            Some(path) => {
                log::warn!("No settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Save settings as pretty RON.
    pub fn save(&self, path: &Path) -> Result<(), DataError> {
        let write_err = |source| DataError::Write {
            path: path.display().to_string(),
            source,
        };
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(write_err)?;
        }

        let pretty = ron::ser::PrettyConfig::new().depth_limit(2);
        let serialized = ron::ser::to_string_pretty(self, pretty)?;
        std::fs::write(path, serialized).map_err(write_err)?;
        Ok(())
    }

    /// Check every section before a run.
    pub fn validate(&self) -> Result<(), SimError> {
        self.simulation.validate()?;
        self.airframe.validate()?;
        if !(self.geodesy.tolerance.is_finite() && self.geodesy.tolerance > 0.0) {
            return Err(SimError::invalid(
                "tolerance",
                format!("must be positive and finite, got {}", self.geodesy.tolerance),
            ));
        }
        if self.geodesy.max_iterations == 0 {
            return Err(SimError::invalid("max_iterations", "must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_serialize() {
        let pretty = ron::ser::PrettyConfig::new();
        let ron_str = ron::ser::to_string_pretty(&Settings::default(), pretty).unwrap();
        assert!(!ron_str.is_empty());
        assert!(ron_str.contains("simulation:"));
        assert!(ron_str.contains("max_time:"));
        assert!(ron_str.contains("area: 0.3"));
    }

    #[test]
    fn settings_roundtrip() {
        let settings = Settings::default();
        let ron_str = ron::to_string(&settings).unwrap();
        let back: Settings = ron::from_str(&ron_str).unwrap();
        assert_eq!(settings, back);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let settings: Settings = ron::from_str("(simulation: (dt: 0.25))").unwrap();
        assert_eq!(settings.simulation.dt, 0.25);
        assert_eq!(settings.simulation.max_time, 36_000.0);
        assert_eq!(settings.airframe, Airframe::default());
        assert_eq!(settings.geodesy, GeodesyConfig::default());
    }

    #[test]
    fn extra_field_ignored() {
        let result: Result<Settings, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("landfall.ron");
        let mut settings = Settings::default();
        settings.simulation.dt = 0.5;
        settings.airframe.mass = 6.8;
        settings.log_level = "debug".to_string();

        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        assert_eq!(settings, loaded);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.ron");
        assert_eq!(Settings::load_or_default(Some(path.as_path())).unwrap(), Settings::default());
        assert!(matches!(Settings::load(&path), Err(DataError::Read { .. })));
    }

    #[test]
    fn garbage_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.ron");
        std::fs::write(&path, "(simulation: [").unwrap();
        assert!(matches!(Settings::load(&path), Err(DataError::Ron(_))));
    }

    #[test]
    fn validate_catches_bad_tolerance() {
        let mut settings = Settings::default();
        assert!(settings.validate().is_ok());
        settings.geodesy.tolerance = 0.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn validate_catches_empty_iteration_budget() {
        let settings: Settings = ron::from_str("(geodesy: (max_iterations: 0))").unwrap();
        assert!(matches!(
            settings.validate(),
            Err(SimError::InvalidParameter { name: "max_iterations", .. })
        ));

        let single: Settings = ron::from_str("(geodesy: (max_iterations: 1))").unwrap();
        assert!(single.validate().is_ok());
    }

    #[test]
    fn geodesy_converts_surface_point() {
        let g = GeodesyConfig::default()
            .to_geodetic(&Ecef::new(wgs84::SEMI_MAJOR, 0.0, 0.0))
            .unwrap();
        assert!(g.alt.abs() < 1e-6);
    }
}
