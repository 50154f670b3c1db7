use super::{Ecef, Geodetic, EARTH_RADIUS};

// ---------------------------------------------------------------------------
// Spherical Earth model (radius EARTH_RADIUS)
// ---------------------------------------------------------------------------

/// Geodetic -> ECEF on a sphere: r = R + alt.
pub fn to_ecef(p: &Geodetic) -> Ecef {
    let lat = p.lat.to_radians();
    let lon = p.lon.to_radians();
    let r = EARTH_RADIUS + p.alt;

    Ecef {
        x: r * lat.cos() * lon.cos(),
        y: r * lat.cos() * lon.sin(),
        z: r * lat.sin(),
    }
}

/// ECEF -> geodetic on a sphere. Exact inverse of [`to_ecef`].
///
/// Latitudes past a pole fold back into [-90, 90] and longitude wraps into
/// (-180, 180]. Undefined (NaN) at Earth's center.
pub fn from_ecef(p: &Ecef) -> Geodetic {
    let r = p.norm();
    // clamp: rounding can push z/r a hair past 1 at the poles
    let lat = (p.z / r).clamp(-1.0, 1.0).asin();
    let lon = p.y.atan2(p.x);

    Geodetic {
        lat: lat.to_degrees(),
        lon: lon.to_degrees(),
        alt: r - EARTH_RADIUS,
    }
}
