//! Children produced when a segment collides with a particle.

use super::segment::{RayClass, RaySegment};
use crate::config::{MAX_GENERATION, SCATTER_OFFSETS, SimulationDesc};
use crate::math::polar;

/// Fan-out table applied at every collision
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterRules {
    /// Angular deltas (radians) of the scattered children
    pub offsets: Vec<f64>,
    /// Children start this far from the collision point along their own angle
    pub offset_distance: f64,
    /// Segments at or above this generation produce no children
    pub max_generation: u32,
}

impl Default for ScatterRules {
    fn default() -> Self {
        Self {
            offsets: SCATTER_OFFSETS.to_vec(),
            offset_distance: 5.0,
            max_generation: MAX_GENERATION,
        }
    }
}

impl ScatterRules {
    pub fn from_desc(desc: &SimulationDesc) -> Self {
        Self {
            offsets: desc.scatter_offsets.clone(),
            offset_distance: desc.scatter_offset_distance,
            max_generation: desc.max_generation,
        }
    }

    /// Largest number of children a single collision can produce
    pub fn max_fan_out(&self) -> usize {
        self.offsets.len() + 1
    }
}

/// Builds the children of a collided segment.
///
/// Primary parents yield one absorbed-path child along the parent angle
/// followed by one scattered child per offset; scattered parents yield the
/// offset fan only; absorbed-path parents and parents at the generation cap
/// yield nothing. The result depends only on the parent's fields.
///
/// Callers must mark the parent with `scatter_already_spawned` right after
/// calling this so it never spawns twice.
pub fn spawn(parent: &RaySegment, rules: &ScatterRules) -> Vec<RaySegment> {
    let Some(collision_point) = parent.collision_point else {
        return Vec::new();
    };
    if parent.generation >= rules.max_generation {
        return Vec::new();
    }

    let generation = parent.generation + 1;
    let child = |angle: f64, class: RayClass| {
        let start = polar(collision_point, rules.offset_distance, angle);
        let mut segment = RaySegment::new(start, angle, class, parent.speed, generation);
        segment.ignored_particle = parent.collision_particle;
        segment
    };

    let mut children = Vec::with_capacity(rules.max_fan_out());
    if parent.class.spawns_absorbed_path() {
        children.push(child(parent.angle, RayClass::AbsorbedPath));
    }
    if let Some(class) = parent.class.scattered_child() {
        children.extend(
            rules
                .offsets
                .iter()
                .map(|offset| child(parent.angle + offset, class)),
        );
    }

    children
}
