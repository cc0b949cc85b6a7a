//! Ray/circle intersection for the absorbing sphere.

use crate::math::{DVec2, Point};

/// The absorbing sphere (a disc in the 2-D playfield).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Point,
    pub radius: f64,
}

impl Sphere {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Distances along a ray at which it crosses the sphere boundary.
    ///
    /// `direction` must be normalized, so the quadratic has `a = 1`. Returns the
    /// two roots in ascending order, or `None` when the discriminant is negative.
    pub fn intersect(&self, origin: Point, direction: DVec2) -> Option<(f64, f64)> {
        let offset = origin - self.center;
        let b = 2.0 * direction.dot(offset);
        let c = offset.length_squared() - self.radius * self.radius;
        let discriminant = b * b - 4.0 * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_disc = discriminant.sqrt();
        Some(((-b - sqrt_disc) / 2.0, (-b + sqrt_disc) / 2.0))
    }

    /// Distance at which a ray that has already travelled `travelled` next meets the boundary.
    ///
    /// The entry root is used unless it is not ahead of `travelled`, in which
    /// case the exit root is used.
    pub fn next_crossing(&self, origin: Point, direction: DVec2, travelled: f64) -> Option<f64> {
        let (near, far) = self.intersect(origin, direction)?;
        Some(if near <= travelled { far } else { near })
    }
}
