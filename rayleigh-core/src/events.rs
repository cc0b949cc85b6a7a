//! Event types for Rayleigh

use crate::ray::{RayClass, SegmentId};

/// Something that happened to a segment during a simulation step.
///
/// Segments are named by their [`SegmentId`], which stays valid after the
/// retention policy removes other segments.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationEvent {
    SegmentCollided {
        segment: SegmentId,
        particle: usize,
        generation: u32,
    },
    SphereStruck {
        segment: SegmentId,
        class: RayClass,
        sector: usize,
    },
    LeftPlayfield {
        segment: SegmentId,
    },
    Spawned {
        parent: SegmentId,
        count: usize,
        generation: u32,
    },
    Retired {
        count: usize,
    },
    SimulationReset {
        primaries: usize,
    },
}

impl SimulationEvent {
    pub fn segment(&self) -> Option<SegmentId> {
        match self {
            Self::SegmentCollided { segment, .. }
            | Self::SphereStruck { segment, .. }
            | Self::LeftPlayfield { segment } => Some(*segment),
            Self::Spawned { parent, .. } => Some(*parent),
            _ => None,
        }
    }

    /// True for events that end a segment's growth
    pub fn is_termination(&self) -> bool {
        matches!(
            self,
            Self::SegmentCollided { .. } | Self::SphereStruck { .. } | Self::LeftPlayfield { .. }
        )
    }
}

/// Timing of a single simulation step, in microseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameTimingEvent {
    pub frame: u64,
    /// Advancing, collision testing and spawning
    pub update_time_us: u64,
    /// Recomputing the wedge tally
    pub tally_time_us: u64,
    pub total_time_us: u64,
    /// Size of the active set after the step
    pub segment_count: usize,
}
