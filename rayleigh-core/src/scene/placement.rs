//! Rejection sampling of particle positions inside an annulus.

use crate::error::{RayleighError, Result};
use crate::math::{DVec2, Point};
use rand::Rng;

/// Annulus `inner <= |p - center| <= outer` that particles are placed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Annulus {
    pub center: Point,
    pub inner: f64,
    pub outer: f64,
}

impl Annulus {
    pub fn new(center: Point, inner: f64, outer: f64) -> Self {
        Self {
            center,
            inner,
            outer,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        let dist_sq = point.distance_squared(self.center);
        dist_sq >= self.inner * self.inner && dist_sq <= self.outer * self.outer
    }

    /// Draws `count` integer-aligned points inside the annulus.
    ///
    /// Candidates are drawn uniformly from the bounding square of the outer
    /// circle and kept only when they fall inside the annulus. Fails once
    /// `max_attempts` candidates have been drawn without filling the request.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        count: usize,
        max_attempts: usize,
        rng: &mut R,
    ) -> Result<Vec<Point>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        if self.outer < self.inner {
            return Err(RayleighError::Placement(format!(
                "outer radius {} is smaller than inner radius {}",
                self.outer, self.inner
            )));
        }

        let cx = self.center.x.round() as i64;
        let cy = self.center.y.round() as i64;
        let span = self.outer.floor() as i64;

        let mut points = Vec::with_capacity(count);
        let mut attempts = 0usize;
        while points.len() < count {
            if attempts >= max_attempts {
                return Err(RayleighError::Placement(format!(
                    "placed {} of {} particles in {} attempts",
                    points.len(),
                    count,
                    attempts
                )));
            }
            attempts += 1;

            let candidate = DVec2::new(
                rng.gen_range(cx - span..=cx + span) as f64,
                rng.gen_range(cy - span..=cy + span) as f64,
            );
            if self.contains(candidate) {
                points.push(candidate);
            }
        }

        if attempts > max_attempts / 2 {
            log::warn!(
                "Particle placement used {} of {} allowed attempts",
                attempts,
                max_attempts
            );
        }
        log::debug!(
            "Placed {} particles in {} attempts (acceptance {:.1}%)",
            count,
            attempts,
            count as f64 / attempts as f64 * 100.0
        );

        Ok(points)
    }
}
