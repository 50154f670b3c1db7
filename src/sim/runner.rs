use nalgebra::{Vector2, Vector3};

use super::event::{self, Phase, Termination};
use super::integrator::euler_step;
use crate::dynamics::state::{Airframe, Release, SimConfig, SimState};
use crate::error::SimError;
use crate::geo::Geodetic;
use crate::physics::{wind_vector, WeatherObservation};

// ---------------------------------------------------------------------------
// Snapshots and results
// ---------------------------------------------------------------------------

/// One point of a descent, as seen before the step that leaves it.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub step: usize,
    pub time: f64,             // s
    pub position: Geodetic,
    pub vel: Vector3<f64>,     // m/s [East, North, Up]
    pub phase: Phase,
}

/// Final fix of a finished descent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    pub position: Geodetic,
    pub time: f64, // s
    pub steps: usize,
    pub status: Termination,
}

impl Impact {
    /// The impact described by a terminal snapshot; `None` while still falling.
    pub fn from_snapshot(snapshot: &Snapshot) -> Option<Impact> {
        let status = snapshot.phase.termination()?;
        Some(Impact {
            position: snapshot.position,
            time: snapshot.time,
            steps: snapshot.step,
            status,
        })
    }

    pub fn lat_lon(&self) -> (f64, f64) {
        (self.position.lat, self.position.lon)
    }

    pub fn is_landed(&self) -> bool {
        self.status == Termination::Landed
    }

    /// The impact if the descent reached the ground, otherwise
    /// [`SimError::SimulationTimeout`] carrying the last fix and the cap
    /// (`max_time`, s) the run was given.
    pub fn landed(self, max_time: f64) -> Result<Impact, SimError> {
        match self.status {
            Termination::Landed => Ok(self),
            Termination::TimedOut => Err(SimError::SimulationTimeout {
                max_time,
                latitude: self.position.lat,
                longitude: self.position.lon,
                altitude: self.position.alt,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Descent: lazy sequence of snapshots
// ---------------------------------------------------------------------------

/// Step-by-step descent from a release point.
///
/// Iterating yields one [`Snapshot`] per state, ending with exactly one
/// terminal snapshot (`Landed` or `TimedOut`). Each `Descent` owns its state;
/// independent descents can run on any number of threads.
#[derive(Debug, Clone)]
pub struct Descent {
    state: SimState,
    fix: Geodetic,
    wind: Vector2<f64>,
    airframe: Airframe,
    config: SimConfig,
    steps: usize,
    finished: bool,
}

impl Descent {
    /// Validate the inputs and set up a descent at time zero.
    ///
    /// Without a weather observation the air is still.
    pub fn new(
        release: &Release,
        airframe: &Airframe,
        weather: Option<&WeatherObservation>,
        config: &SimConfig,
    ) -> Result<Self, SimError> {
        release.validate()?;
        airframe.validate()?;
        config.validate()?;
        if let Some(obs) = weather {
            obs.validate()?;
        }

        let wind = weather.map(wind_vector).unwrap_or_else(Vector2::zeros);
        log::debug!(
            "descent from ({:.5}, {:.5}) at {:.0} m, wind ({:.2}, {:.2}) m/s, dt={} s, cap {} s",
            release.position.lat,
            release.position.lon,
            release.position.alt,
            wind.x,
            wind.y,
            config.dt,
            config.max_time
        );

        Ok(Self {
            state: SimState::at_release(release),
            // the release fix is exact; reconverting would add rounding noise
            fix: release.position,
            wind,
            airframe: *airframe,
            config: *config,
            steps: 0,
            finished: false,
        })
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Current phase without advancing.
    pub fn phase(&self) -> Phase {
        event::classify(&self.fix, self.steps, &self.config)
    }

    /// Snapshot the current state, then step if still falling.
    ///
    /// Once terminal, keeps returning the same terminal snapshot.
    pub fn advance(&mut self) -> Snapshot {
        let phase = self.phase();
        let snapshot = Snapshot {
            step: self.steps,
            time: self.state.time,
            position: self.fix,
            vel: self.state.vel,
            phase,
        };

        if phase == Phase::Falling {
            self.state = euler_step(
                &self.state,
                &self.fix,
                &self.wind,
                &self.airframe,
                self.config.dt,
            );
            self.fix = self.state.geodetic();
            self.steps += 1;
            log::trace!(
                "t={:.1}s alt={:.1}m vz={:.2}m/s",
                self.state.time,
                self.fix.alt,
                self.state.vel.z
            );
        }

        snapshot
    }
}

impl Iterator for Descent {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Snapshot> {
        if self.finished {
            return None;
        }
        let snapshot = self.advance();
        self.finished = snapshot.phase.is_terminal();
        Some(snapshot)
    }
}

// ---------------------------------------------------------------------------
// Drivers
// ---------------------------------------------------------------------------

/// Run a descent to ground contact or the time cap.
///
/// A timeout is not an error here: the result is tagged
/// [`Termination::TimedOut`]. Use [`Impact::landed`] to turn it into one.
pub fn simulate_fall(
    release: &Release,
    airframe: &Airframe,
    weather: Option<&WeatherObservation>,
    config: &SimConfig,
) -> Result<Impact, SimError> {
    let mut descent = Descent::new(release, airframe, weather, config)?;

    loop {
        if let Some(impact) = Impact::from_snapshot(&descent.advance()) {
            match impact.status {
                Termination::Landed => log::debug!(
                    "landed at ({:.5}, {:.5}) after {:.0} s, {} steps",
                    impact.position.lat,
                    impact.position.lon,
                    impact.time,
                    impact.steps
                ),
                Termination::TimedOut => log::warn!(
                    "still at {:.0} m after {} s; reporting last fix ({:.5}, {:.5})",
                    impact.position.alt,
                    config.max_time,
                    impact.position.lat,
                    impact.position.lon
                ),
            }
            return Ok(impact);
        }
    }
}

/// Run a descent and keep every snapshot, terminal one last.
pub fn simulate_trajectory(
    release: &Release,
    airframe: &Airframe,
    weather: Option<&WeatherObservation>,
    config: &SimConfig,
) -> Result<Vec<Snapshot>, SimError> {
    let descent = Descent::new(release, airframe, weather, config)?;
    let capacity = config.max_steps().saturating_add(1).min(100_000);
    let mut trajectory = Vec::with_capacity(capacity);
    trajectory.extend(descent);
    Ok(trajectory)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::gravity::G;
    use approx::assert_abs_diff_eq;

    fn vacuum() -> Airframe {
        Airframe {
            cd: 0.0,
            ..Default::default()
        }
    }

    fn fall(release: &Release, weather: Option<&WeatherObservation>) -> Impact {
        simulate_fall(release, &Airframe::default(), weather, &SimConfig::default()).unwrap()
    }

    fn still_air_descent(release: &Release) -> Descent {
        Descent::new(release, &Airframe::default(), None, &SimConfig::default()).unwrap()
    }

    #[test]
    fn ground_release_lands_immediately() {
        let release = Release::at(Geodetic::new(51.5, -0.12, 0.0));
        let impact = fall(&release, None);
        assert_eq!(impact.status, Termination::Landed);
        assert_eq!(impact.steps, 0);
        assert_eq!(impact.time, 0.0);
        assert_eq!(impact.lat_lon(), (51.5, -0.12));
    }

    #[test]
    fn vacuum_drop_falls_straight_down() {
        let altitude = 1_000.0;
        let release = Release::at(Geodetic::new(-33.9, 18.4, altitude));
        let config = SimConfig {
            dt: 0.1,
            ..Default::default()
        };
        let impact = simulate_fall(&release, &vacuum(), None, &config).unwrap();

        assert!(impact.is_landed());
        assert_abs_diff_eq!(impact.position.lat, -33.9, epsilon = 1e-9);
        assert_abs_diff_eq!(impact.position.lon, 18.4, epsilon = 1e-9);
        let expected = (2.0 * altitude / G).sqrt();
        assert_abs_diff_eq!(impact.time, expected, epsilon = config.dt);
    }

    #[test]
    fn vacuum_drop_default_step() {
        let release = Release::at(Geodetic::new(0.0, 0.0, 1_000.0));
        let impact = simulate_fall(&release, &vacuum(), None, &SimConfig::default()).unwrap();
        // Euler lands on the first whole step with g*n(n+1)/2 >= h
        assert_eq!(impact.steps, 14);
        assert_abs_diff_eq!(impact.time, (2_000.0 / G).sqrt(), epsilon = 1.0);
    }

    #[test]
    fn strong_updraft_times_out() {
        let release = Release::at(Geodetic::new(10.0, 10.0, 100.0))
            .with_velocity(Vector3::new(0.0, 0.0, 5_000.0));
        let config = SimConfig {
            dt: 1.0,
            max_time: 60.0,
        };
        let impact = simulate_fall(&release, &vacuum(), None, &config).unwrap();

        assert_eq!(impact.status, Termination::TimedOut);
        assert_eq!(impact.steps, 60);
        assert!(impact.position.alt > 0.0);
        assert!(matches!(
            impact.landed(config.max_time),
            Err(SimError::SimulationTimeout { max_time, .. }) if max_time == 60.0
        ));
    }

    #[test]
    fn zero_time_cap_reports_release_point() {
        let release = Release::at(Geodetic::new(5.0, 6.0, 3_000.0));
        let config = SimConfig {
            dt: 1.0,
            max_time: 0.0,
        };
        let impact = simulate_fall(&release, &Airframe::default(), None, &config).unwrap();
        assert_eq!(impact.status, Termination::TimedOut);
        assert_eq!(impact.lat_lon(), (5.0, 6.0));
    }

    #[test]
    fn westerly_pushes_impact_east() {
        let release = Release::at(Geodetic::new(40.0, -100.0, 5_000.0));
        let wind = WeatherObservation::mph(20.0, 270.0);
        let impact = fall(&release, Some(&wind));

        assert!(impact.is_landed());
        assert!(impact.position.lon > -100.0, "impact should drift east");
        assert_abs_diff_eq!(impact.position.lat, 40.0, epsilon = 1e-6);
    }

    #[test]
    fn drag_slows_the_fall() {
        let release = Release::at(Geodetic::new(0.0, 0.0, 3_000.0));
        let config = SimConfig::default();
        let with_drag = simulate_fall(&release, &Airframe::default(), None, &config).unwrap();
        let without = simulate_fall(&release, &vacuum(), None, &config).unwrap();
        assert!(with_drag.time > 5.0 * without.time);
    }

    #[test]
    fn iterator_ends_with_single_terminal_snapshot() {
        let release = Release::at(Geodetic::new(0.0, 0.0, 200.0));
        let snaps: Vec<Snapshot> = still_air_descent(&release).collect();

        let (last, rest) = snaps.split_last().unwrap();
        assert_eq!(last.phase, Phase::Landed);
        assert!(rest.iter().all(|s| s.phase == Phase::Falling));
        for (i, s) in snaps.iter().enumerate() {
            assert_eq!(s.step, i);
        }
        assert!(last.position.alt <= 0.0);
    }

    #[test]
    fn advance_after_landing_is_stable() {
        let release = Release::at(Geodetic::new(0.0, 0.0, 0.0));
        let mut descent = still_air_descent(&release);
        let a = descent.advance();
        let b = descent.advance();
        assert_eq!(a, b);
        assert_eq!(descent.steps(), 0);
    }

    #[test]
    fn trajectory_matches_impact() {
        let release = Release::at(Geodetic::new(45.0, 7.0, 2_500.0));
        let wind = WeatherObservation::mph(8.0, 45.0);
        let config = SimConfig::default();
        let frame = Airframe::default();
        let traj = simulate_trajectory(&release, &frame, Some(&wind), &config).unwrap();
        let impact = simulate_fall(&release, &frame, Some(&wind), &config).unwrap();

        let last = traj.last().unwrap();
        assert_eq!(last.position, impact.position);
        assert_eq!(last.step, impact.steps);
        assert_eq!(traj.len(), impact.steps + 1);
    }

    #[test]
    fn invalid_inputs_rejected_up_front() {
        let release = Release::at(Geodetic::new(0.0, 0.0, 100.0));
        let bad = SimConfig {
            dt: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            simulate_fall(&release, &Airframe::default(), None, &bad),
            Err(SimError::InvalidParameter { name: "dt", .. })
        ));
        let heavy_nothing = Airframe {
            mass: 0.0,
            ..Default::default()
        };
        assert!(simulate_fall(&release, &heavy_nothing, None, &SimConfig::default()).is_err());
    }

    #[test]
    fn non_finite_wind_rejected_before_stepping() {
        let release = Release::at(Geodetic::new(40.0, -100.0, 5_000.0));
        let config = SimConfig::default();
        for wind in [
            WeatherObservation::mph(f64::NAN, 270.0),
            WeatherObservation::mph(20.0, f64::INFINITY),
        ] {
            assert!(matches!(
                simulate_fall(&release, &Airframe::default(), Some(&wind), &config),
                Err(SimError::InvalidParameter { .. })
            ));
            assert!(Descent::new(&release, &Airframe::default(), Some(&wind), &config).is_err());
        }
    }

    #[test]
    fn descents_are_independent_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                std::thread::spawn(move || {
                    let release = Release::at(Geodetic::new(10.0 * i as f64, 0.0, 1_500.0));
                    fall(&release, None)
                })
            })
            .collect();
        let impacts: Vec<Impact> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for (i, impact) in impacts.iter().enumerate() {
            assert!(impact.is_landed());
            assert_abs_diff_eq!(impact.position.lat, 10.0 * i as f64, epsilon = 1e-9);
            assert_eq!(impact.steps, impacts[0].steps);
        }
    }
}
