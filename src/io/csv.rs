use std::io::{self, Write};

use crate::sim::{Phase, Snapshot};

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Falling => "falling",
        Phase::Landed => "landed",
        Phase::TimedOut => "timed_out",
    }
}

/// Write trajectory data to CSV format.
///
/// Columns: step, time, lat_deg, lon_deg, alt_m, vel_e, vel_n, vel_u, phase
pub fn write_trajectory<W: Write>(writer: &mut W, trajectory: &[Snapshot]) -> io::Result<()> {
    writeln!(writer, "step,time,lat_deg,lon_deg,alt_m,vel_e,vel_n,vel_u,phase")?;

    for s in trajectory {
        writeln!(
            writer,
            "{},{:.3},{:.7},{:.7},{:.2},{:.3},{:.3},{:.3},{}",
            s.step,
            s.time,
            s.position.lat, s.position.lon, s.position.alt,
            s.vel.x, s.vel.y, s.vel.z,
            phase_label(s.phase),
        )?;
    }

    Ok(())
}

/// Write trajectory to a CSV file at the given path.
pub fn write_trajectory_file(path: &str, trajectory: &[Snapshot]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_trajectory(&mut file, trajectory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Geodetic;
    use nalgebra::Vector3;

    #[test]
    fn csv_output_has_header_and_rows() {
        let traj = vec![
            Snapshot {
                step: 0,
                time: 0.0,
                position: Geodetic::new(40.0, -105.0, 100.0),
                vel: Vector3::zeros(),
                phase: Phase::Falling,
            },
            Snapshot {
                step: 1,
                time: 1.0,
                position: Geodetic::new(40.0, -105.0, -0.5),
                vel: Vector3::new(0.0, 0.0, -9.81),
                phase: Phase::Landed,
            },
        ];

        let mut buf = Vec::new();
        write_trajectory(&mut buf, &traj).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("step,time,"));
        assert_eq!(lines.len(), 3); // header + 2 data rows
        assert!(lines[1].starts_with("0,0.000,40.0000000,-105.0000000,100.00,"));
        assert!(lines[2].ends_with("-9.810,landed"));
    }
}
