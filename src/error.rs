//! Error types for the simulator core and its input layer.

/// Failures of the numerical core.
///
/// Every variant is a deterministic function of the inputs; retrying the same
/// call gives the same answer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    /// The iterative WGS84 latitude solve ran out of iterations.
    #[error("WGS84 latitude did not converge after {iterations} iterations (last change {residual:e} rad)")]
    ConvergenceFailure { iterations: usize, residual: f64 },

    /// The descent was still airborne when the time cap was reached.
    #[error(
        "no ground contact within {max_time} s (last fix {latitude:.5}, {longitude:.5} at {altitude:.0} m)"
    )]
    SimulationTimeout {
        max_time: f64,
        latitude: f64,
        longitude: f64,
        altitude: f64,
    },

    /// A Cartesian position with no geodetic equivalent (Earth's center, NaN, ...).
    #[error("position ({x}, {y}, {z}) has no geodetic equivalent")]
    DegeneratePosition { x: f64, y: f64, z: f64 },

    /// A configuration or airframe value outside its valid range.
    #[error("invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl SimError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        SimError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Failures while reading or writing settings, feed, weather and report documents.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse settings: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("failed to serialize settings: {0}")]
    RonSerialize(#[from] ron::Error),

    /// The document parsed but lacks a field the core needs.
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("unsupported wind speed unit `{0}`")]
    UnknownUnit(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_names_last_fix() {
        let err = SimError::SimulationTimeout {
            max_time: 60.0,
            latitude: 12.345_678,
            longitude: -45.0,
            altitude: 1500.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("60 s"));
        assert!(msg.contains("12.34568"));
        assert!(msg.contains("1500 m"));
    }

    #[test]
    fn invalid_parameter_message() {
        let err = SimError::invalid("dt", "must be positive, got -1");
        assert_eq!(err.to_string(), "invalid dt: must be positive, got -1");
    }
}
