// ---------------------------------------------------------------------------
// Isothermal exponential atmosphere
// ---------------------------------------------------------------------------

pub const RHO0: f64 = 1.225; // sea-level density, kg/m^3
pub const SCALE_HEIGHT: f64 = 8_500.0; // m

/// Air density at a geometric altitude: rho = rho0 * exp(-h / H).
///
/// Strictly decreasing and positive for every finite altitude. Below sea
/// level it keeps growing past rho0, which is only meaningful for a few
/// hundred meters of terrain below the datum.
pub fn air_density(altitude_m: f64) -> f64 {
    RHO0 * (-altitude_m / SCALE_HEIGHT).exp()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
