/// How long terminated segments stay in the active set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionPolicy {
    /// Never retire segments. Growth is still bounded by the generation cap.
    KeepAll,
    /// Retire a segment once it has been terminated for more than `frames` frames
    RetireAfter {
        /// Frames a terminated segment stays visible
        frames: u32,
    },
    /// Retire the oldest terminated segments while the set holds more than `max_segments`
    Cap {
        /// Upper bound on the active set after each frame (live segments are never dropped)
        max_segments: usize,
    },
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::KeepAll
    }
}

impl RetentionPolicy {
    /// Keep every segment for the lifetime of the simulation
    pub fn keep_all() -> Self {
        Self::KeepAll
    }

    /// Retire segments `frames` frames after they terminate
    pub fn retire_after(frames: u32) -> Self {
        Self::RetireAfter { frames }
    }

    /// Bound the active set to `max_segments`
    pub fn cap(max_segments: usize) -> Self {
        Self::Cap { max_segments }
    }
}

/// How segments are tested against particles each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionMode {
    /// Point-in-disc test at the new endpoint only.
    ///
    /// Can tunnel through a particle when `speed` exceeds the particle diameter.
    #[default]
    Discrete,
    /// Test the whole path covered this frame against every particle disc
    Swept,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retention_defaults() {
        assert_eq!(RetentionPolicy::default(), RetentionPolicy::KeepAll);
        assert_eq!(RetentionPolicy::keep_all(), RetentionPolicy::KeepAll);
        assert_eq!(
            RetentionPolicy::retire_after(10),
            RetentionPolicy::RetireAfter { frames: 10 }
        );
        assert_eq!(
            RetentionPolicy::cap(500),
            RetentionPolicy::Cap { max_segments: 500 }
        );
    }

    #[test]
    fn test_collision_mode_default() {
        assert_eq!(CollisionMode::default(), CollisionMode::Discrete);
    }
}
