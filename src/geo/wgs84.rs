use super::{Ecef, Geodetic};
use crate::error::SimError;

// ---------------------------------------------------------------------------
// WGS84 ellipsoid
// ---------------------------------------------------------------------------

pub const SEMI_MAJOR: f64 = 6_378_137.0; // a, m
pub const SEMI_MINOR: f64 = 6_356_752.314_245; // b, m

/// First eccentricity squared: 1 - b²/a².
pub const E2: f64 = 1.0 - (SEMI_MINOR * SEMI_MINOR) / (SEMI_MAJOR * SEMI_MAJOR);

/// Default latitude convergence threshold, rad.
pub const DEFAULT_TOLERANCE: f64 = 1e-12;

/// Default cap on latitude refinements. Convergence is linear with a ratio of
/// roughly e², so physical inputs settle in well under ten passes.
pub const DEFAULT_MAX_ITERATIONS: usize = 64;

/// Below this distance from Earth's center no latitude is defined.
const MIN_RADIUS: f64 = 1.0; // m

/// Prime vertical radius of curvature N(lat).
fn prime_vertical(lat: f64) -> f64 {
    SEMI_MAJOR / (1.0 - E2 * lat.sin().powi(2)).sqrt()
}

/// Geodetic -> ECEF on the WGS84 ellipsoid (closed form).
pub fn to_ecef(p: &Geodetic) -> Ecef {
    let lat = p.lat.to_radians();
    let lon = p.lon.to_radians();
    let n = prime_vertical(lat);

    Ecef {
        x: (n + p.alt) * lat.cos() * lon.cos(),
        y: (n + p.alt) * lat.cos() * lon.sin(),
        z: (n * (1.0 - E2) + p.alt) * lat.sin(),
    }
}

/// ECEF -> geodetic on the WGS84 ellipsoid with the default iteration cap.
///
/// `tolerance` is the change in latitude (rad) between successive refinements
/// below which the solve stops; [`DEFAULT_TOLERANCE`] is 1e-12.
pub fn from_ecef(p: &Ecef, tolerance: f64) -> Result<Geodetic, SimError> {
    from_ecef_with(p, tolerance, DEFAULT_MAX_ITERATIONS)
}

/// ECEF -> geodetic on the WGS84 ellipsoid.
///
/// Fixed-point refinement of `lat = atan2(z + e² N(lat) sin(lat), p)` seeded
/// with `atan2(z, p (1 - e²))`, where `p` is the distance from the polar axis.
pub fn from_ecef_with(
    p: &Ecef,
    tolerance: f64,
    max_iterations: usize,
) -> Result<Geodetic, SimError> {
    if !(tolerance.is_finite() && tolerance > 0.0) {
        return Err(SimError::invalid(
            "tolerance",
            format!("must be positive and finite, got {tolerance}"),
        ));
    }
    if !p.is_finite() || p.norm() < MIN_RADIUS {
        return Err(SimError::DegeneratePosition {
            x: p.x,
            y: p.y,
            z: p.z,
        });
    }

    let lon = p.y.atan2(p.x);
    let rho = p.x.hypot(p.y);

    let mut lat = p.z.atan2(rho * (1.0 - E2));
    let mut residual = f64::INFINITY;
    let mut iterations = 0;

    while residual >= tolerance {
        if iterations == max_iterations {
            return Err(SimError::ConvergenceFailure {
                iterations,
                residual,
            });
        }
        let n = prime_vertical(lat);
        let next = (p.z + E2 * n * lat.sin()).atan2(rho);
        residual = (next - lat).abs();
        lat = next;
        iterations += 1;
    }

    let n = prime_vertical(lat);
    let (sin_lat, cos_lat) = lat.sin_cos();
    // p / cos(lat) loses all precision near the poles; switch to the z form there
    let alt = if cos_lat.abs() > 1e-3 {
        rho / cos_lat - n
    } else {
        p.z.abs() / sin_lat.abs() - n * (1.0 - E2)
    };

    log::trace!("wgs84 solve converged in {iterations} iterations");

    Ok(Geodetic {
        lat: lat.to_degrees(),
        lon: lon.to_degrees(),
        alt,
    })
}
