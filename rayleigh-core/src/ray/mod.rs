//! Ray segments: growth, collision and scattering.
//!
//! - [`RaySegment`] / [`RayClass`]: per-segment state and the behaviour table
//!   keyed by class
//! - [`advance`]: one frame of growth plus the edge, sphere and particle tests
//! - [`spawn`]: children produced by a collided segment

pub mod propagate;
pub mod scatter;
pub mod segment;

pub use propagate::advance;
pub use scatter::{ScatterRules, spawn};
pub use segment::{RayClass, RaySegment, SegmentId, Termination};
