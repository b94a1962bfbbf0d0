use std::fmt;

use crate::math::Vector3;

/// Volume predicate of a region.
///
/// `distance` is a signed distance (negative inside) used for containment;
/// `first_intersection` returns the smallest `t > 0` at which the segment
/// `p0 + t * (p1 - p0)` crosses the surface, or `f64::INFINITY` if it never
/// does. Values of `t` above 1 mean the crossing lies beyond `p1`.
pub trait Shape: Send + Sync + fmt::Debug {
    fn distance(&self, point: &Vector3) -> f64;

    fn contains(&self, point: &Vector3) -> bool {
        self.distance(point) <= 0.0
    }

    fn first_intersection(&self, p0: &Vector3, p1: &Vector3) -> f64;
}

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

/// All of space. Used for the chamber when no bounding shape is needed.
#[derive(Clone, Copy, Debug, Default)]
pub struct Everywhere;

impl Shape for Everywhere {
    fn distance(&self, _point: &Vector3) -> f64 {
        f64::NEG_INFINITY
    }

    fn first_intersection(&self, _p0: &Vector3, _p1: &Vector3) -> f64 {
        f64::INFINITY
    }
}

#[derive(Clone, Debug)]
pub struct Sphere {
    pub center: Vector3,
    pub radius: f64,
}

impl Sphere {
    pub fn new(center: Vector3, radius: f64) -> Self {
        Self { center, radius }
    }
}

impl Shape for Sphere {
    fn distance(&self, point: &Vector3) -> f64 {
        (point - self.center).norm() - self.radius
    }

    fn first_intersection(&self, p0: &Vector3, p1: &Vector3) -> f64 {
        // |p0 + t d - c|^2 = r^2
        let d = p1 - p0;
        let m = p0 - self.center;
        let a = d.dot(&d);
        if a == 0.0 {
            return f64::INFINITY;
        }
        let b = m.dot(&d);
        let c = m.dot(&m) - self.radius * self.radius;
        let disc = b * b - a * c;
        if disc < 0.0 {
            return f64::INFINITY;
        }
        let root = disc.sqrt();
        let t0 = (-b - root) / a;
        let t1 = (-b + root) / a;
        if t0 > 0.0 {
            t0
        } else if t1 > 0.0 {
            t1
        } else {
            f64::INFINITY
        }
    }
}

/// Axis-aligned box `[min, max]`.
#[derive(Clone, Debug)]
pub struct Block {
    pub min: Vector3,
    pub max: Vector3,
}

impl Block {
    pub fn new(min: Vector3, max: Vector3) -> Self {
        Self { min, max }
    }

    /// Box of size `dims` centred on `center`.
    pub fn centered(center: Vector3, dims: Vector3) -> Self {
        Self { min: center - dims / 2.0, max: center + dims / 2.0 }
    }

    pub fn center(&self) -> Vector3 {
        (self.min + self.max) * 0.5
    }
}

impl Shape for Block {
    fn distance(&self, point: &Vector3) -> f64 {
        let half = (self.max - self.min) * 0.5;
        let d = (point - self.center()).abs() - half;
        let outside = Vector3::new(d.x.max(0.0), d.y.max(0.0), d.z.max(0.0)).norm();
        let inside = d.x.max(d.y).max(d.z).min(0.0);
        outside + inside
    }

    fn first_intersection(&self, p0: &Vector3, p1: &Vector3) -> f64 {
        let d = p1 - p0;
        let mut t_near = f64::NEG_INFINITY;
        let mut t_far = f64::INFINITY;
        for a in 0..3 {
            if d[a] == 0.0 {
                if p0[a] < self.min[a] || p0[a] > self.max[a] {
                    return f64::INFINITY;
                }
                continue;
            }
            let ta = (self.min[a] - p0[a]) / d[a];
            let tb = (self.max[a] - p0[a]) / d[a];
            t_near = t_near.max(ta.min(tb));
            t_far = t_far.min(ta.max(tb));
        }
        if t_near > t_far {
            return f64::INFINITY;
        }
        if t_near > 0.0 {
            t_near
        } else if t_far > 0.0 {
            t_far
        } else {
            f64::INFINITY
        }
    }
}

/// Half-space below a plane: points with `normal . (p - point) <= 0`.
///
/// With `normal = +z` this is a bulk substrate whose surface is the plane.
#[derive(Clone, Debug)]
pub struct HalfSpace {
    pub normal: Vector3,
    pub point: Vector3,
}

impl HalfSpace {
    /// `normal` is normalised; it points out of the solid side.
    pub fn new(normal: Vector3, point: Vector3) -> Self {
        Self { normal: normal.normalize(), point }
    }
}

impl Shape for HalfSpace {
    fn distance(&self, point: &Vector3) -> f64 {
        self.normal.dot(&(point - self.point))
    }

    fn first_intersection(&self, p0: &Vector3, p1: &Vector3) -> f64 {
        let denom = self.normal.dot(&(p1 - p0));
        if denom == 0.0 {
            return f64::INFINITY;
        }
        let t = self.normal.dot(&(self.point - p0)) / denom;
        if t > 0.0 {
            t
        } else {
            f64::INFINITY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sphere_exit_from_center() {
        let s = Sphere::new(Vector3::zeros(), 2.0);
        let t = s.first_intersection(&Vector3::zeros(), &Vector3::new(4.0, 0.0, 0.0));
        assert_relative_eq!(t, 0.5);
        assert!(s.contains(&Vector3::new(1.0, 1.0, 1.0)));
    }

    #[test]
    fn sphere_missed() {
        let s = Sphere::new(Vector3::zeros(), 1.0);
        let t = s.first_intersection(&Vector3::new(-5.0, 3.0, 0.0), &Vector3::new(5.0, 3.0, 0.0));
        assert_eq!(t, f64::INFINITY);
    }

    #[test]
    fn block_entry_and_exit() {
        let b = Block::new(Vector3::zeros(), Vector3::new(1.0, 1.0, 1.0));
        let entry = b.first_intersection(&Vector3::new(-1.0, 0.5, 0.5), &Vector3::new(3.0, 0.5, 0.5));
        assert_relative_eq!(entry, 0.25);
        let exit = b.first_intersection(&Vector3::new(0.5, 0.5, 0.5), &Vector3::new(0.5, 0.5, 2.5));
        assert_relative_eq!(exit, 0.25);
        assert!(b.contains(&Vector3::new(1.0, 0.0, 0.5)));
        assert!(!b.contains(&Vector3::new(1.1, 0.0, 0.5)));
    }

    #[test]
    fn substrate_surface_crossing() {
        let h = HalfSpace::new(Vector3::new(0.0, 0.0, 2.0), Vector3::zeros());
        assert!(h.contains(&Vector3::new(3.0, 3.0, -1.0)));
        assert!(!h.contains(&Vector3::new(0.0, 0.0, 1.0)));
        let t = h.first_intersection(&Vector3::new(0.0, 0.0, -1.0), &Vector3::new(0.0, 0.0, 3.0));
        assert_relative_eq!(t, 0.25);
        let parallel = h.first_intersection(&Vector3::new(0.0, 0.0, -1.0), &Vector3::new(1.0, 0.0, -1.0));
        assert_eq!(parallel, f64::INFINITY);
    }
}
