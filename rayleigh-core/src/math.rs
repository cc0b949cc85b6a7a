//! Math types for Rayleigh

use std::f64::consts::TAU;

pub use glam::DVec2;

/// A position on the playfield, in screen units (x right, y down).
pub type Point = DVec2;

/// Below this magnitude a direction component is treated as zero.
pub const EPSILON: f64 = 1e-9;

/// Unit direction vector for an angle in radians.
#[inline]
pub fn direction(angle: f64) -> DVec2 {
    DVec2::new(angle.cos(), angle.sin())
}

/// Maps an angle from `atan2` into `[0, 2π)`.
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    if angle < 0.0 { angle + TAU } else { angle }
}

/// Point at `radius` from `center` along `angle`.
#[inline]
pub fn polar(center: Point, radius: f64, angle: f64) -> Point {
    center + direction(angle) * radius
}
