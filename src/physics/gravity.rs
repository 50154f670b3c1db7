use nalgebra::Vector3;

/// Constant surface gravity, m/s^2.
pub const G: f64 = 9.81;

/// Gravity in the local ENU frame: straight down, altitude-independent.
///
/// Over a 40 km descent the inverse-square falloff would be ~1.2%, well
/// inside the error of the drag model.
pub fn gravity_accel() -> Vector3<f64> {
    Vector3::new(0.0, 0.0, -G)
}
