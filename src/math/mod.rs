//! Linear algebra type aliases, unit conversions and geometric tolerances.

pub type Vector3 = nalgebra::Vector3<f64>;

/// Geometric tolerance for point coincidence tests (meters).
pub const TOLERANCE: f64 = 1e-9;

/// Elementary charge in coulombs; one electron-volt in joules.
pub const ELECTRON_VOLT: f64 = 1.602_176_634e-19;

/// Unit vector along +z, the default surface normal of a substrate.
pub fn z_axis() -> Vector3 {
    Vector3::new(0.0, 0.0, 1.0)
}

/// Convert an energy in joules to electron-volts.
#[inline]
pub fn joules_to_ev(energy: f64) -> f64 {
    energy / ELECTRON_VOLT
}

/// Convert an energy in electron-volts to joules.
#[inline]
pub fn ev_to_joules(energy: f64) -> f64 {
    energy * ELECTRON_VOLT
}
