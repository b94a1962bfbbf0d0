use log::warn;

use crate::error::{Error, Result};
use crate::event::ElectronState;
use crate::math::{Vector3, TOLERANCE};

/// Reference axis for radial distributions: a point on the sample surface
/// and the surface normal through it.
///
/// The radius of a point is its distance from the line through `center`
/// along `normal`, `|normal x (p - center)|`.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferencePlane {
    center: Vector3,
    normal: Vector3,
}

impl ReferencePlane {
    pub fn new(center: Vector3, normal: Vector3) -> Result<Self> {
        let len = normal.norm();
        if !(len > 0.0) || !len.is_finite() {
            return Err(Error::precondition(format!("normal must be non-zero: {:?}", normal)));
        }
        if (len - 1.0).abs() > TOLERANCE {
            warn!("reference normal {:?} is not unit length; normalising", normal);
        }
        Ok(Self { center, normal: normal / len })
    }

    pub fn center(&self) -> Vector3 {
        self.center
    }

    pub fn normal(&self) -> Vector3 {
        self.normal
    }

    /// Whether `p` lies on the normal side of the plane (the plane included).
    pub fn is_above(&self, p: &Vector3) -> bool {
        self.normal.dot(&(p - self.center)) >= 0.0
    }

    /// Distance from the axis, without any side test.
    pub fn radius_of(&self, p: &Vector3) -> f64 {
        self.normal.cross(&(p - self.center)).norm()
    }

    /// Radius of a backscattered electron where it left the sample.
    ///
    /// The side test uses the position after the step; the radius uses the
    /// position before it. `None` if the electron ended below the plane.
    pub fn radius_at_step_start(&self, state: &ElectronState) -> Option<f64> {
        self.is_above(&state.position).then(|| self.radius_of(&state.prev_position))
    }

    /// Radius of `p`, or `None` if `p` is below the plane.
    pub fn radius_at_step_end(&self, p: &Vector3) -> Option<f64> {
        self.is_above(p).then(|| self.radius_of(p))
    }
}
