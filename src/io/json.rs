use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::DataError;
use crate::geo::Geodetic;
use crate::sim::integrator::METERS_PER_DEG;
use crate::sim::{Impact, Snapshot, Termination};

/// Summary statistics computed from a descent trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DescentSummary {
    pub max_speed: f64,     // m/s
    pub impact_speed: f64,  // m/s
    pub flight_time: f64,   // s
    pub drift_m: f64,       // horizontal distance release -> impact, m
    pub drift_bearing: f64, // deg clockwise from north
}

impl DescentSummary {
    /// Compute summary from trajectory data. `None` for an empty trajectory.
    pub fn from_trajectory(trajectory: &[Snapshot]) -> Option<Self> {
        let first = trajectory.first()?;
        let last = trajectory.last()?;

        let max_speed = trajectory
            .iter()
            .map(|s| s.vel.norm())
            .fold(0.0_f64, f64::max);

        let (east, north) = local_offset(&first.position, &last.position);

        Some(DescentSummary {
            max_speed,
            impact_speed: last.vel.norm(),
            flight_time: last.time,
            drift_m: east.hypot(north),
            drift_bearing: east.atan2(north).to_degrees().rem_euclid(360.0),
        })
    }
}

/// East/north offset in meters between two fixes, with the same
/// meters-per-degree scale the integrator moves by.
fn local_offset(from: &Geodetic, to: &Geodetic) -> (f64, f64) {
    let mut dlon = to.lon - from.lon;
    if dlon > 180.0 {
        dlon -= 360.0;
    } else if dlon < -180.0 {
        dlon += 360.0;
    }
    let east = dlon * METERS_PER_DEG * from.lat.to_radians().cos();
    let north = (to.lat - from.lat) * METERS_PER_DEG;
    (east, north)
}

/// Landing estimate as handed to the map renderer and API clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactReport {
    pub latitude: f64,
    pub longitude: f64,
    pub status: Termination,
    pub flight_time_s: f64,
    pub steps: usize,
    pub release: Geodetic,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub summary: Option<DescentSummary>,
}

impl ImpactReport {
    pub fn new(release: &Geodetic, impact: &Impact) -> Self {
        Self {
            latitude: impact.position.lat,
            longitude: impact.position.lon,
            status: impact.status,
            flight_time_s: impact.time,
            steps: impact.steps,
            release: *release,
            summary: None,
        }
    }

    pub fn with_summary(mut self, summary: Option<DescentSummary>) -> Self {
        self.summary = summary;
        self
    }
}

/// Write an impact report as pretty JSON to a writer.
pub fn write_report<W: Write>(writer: &mut W, report: &ImpactReport) -> Result<(), DataError> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer).map_err(serde_json::Error::io)?;
    Ok(())
}

/// Write an impact report to a file.
pub fn write_report_file(path: &str, report: &ImpactReport) -> Result<(), DataError> {
    let mut file = std::fs::File::create(path).map_err(|source| DataError::Write {
        path: path.to_string(),
        source,
    })?;
    write_report(&mut file, report)
}
