use crate::math::{self, DVec2, EPSILON, Point};
use crate::render::Rgb;

/// Kind of a ray segment.
///
/// The class decides both the scattering behaviour and the colour a segment is
/// drawn with; simulation rules only ever look at the class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RayClass {
    /// Emitted directly by the light source (drawn white)
    Primary,
    /// Produced by a collision and able to scatter again (drawn blue)
    Scattered,
    /// One-off byproduct of a primary collision that never scatters (drawn red)
    AbsorbedPath,
}

impl RayClass {
    /// Tally order used by the wedge counters: white, red, blue
    pub const ALL: [RayClass; 3] = [Self::Primary, Self::AbsorbedPath, Self::Scattered];

    /// Whether segments of this class test for particle collisions
    pub fn can_scatter(self) -> bool {
        !matches!(self, Self::AbsorbedPath)
    }

    /// Whether a collision spawns an absorbed-path child along the parent angle
    pub fn spawns_absorbed_path(self) -> bool {
        matches!(self, Self::Primary)
    }

    /// Class of the fan of children produced at the scatter offsets
    pub fn scattered_child(self) -> Option<RayClass> {
        match self {
            Self::Primary | Self::Scattered => Some(Self::Scattered),
            Self::AbsorbedPath => None,
        }
    }

    /// Short label used in the wedge counters
    pub fn tally_label(self) -> &'static str {
        match self {
            Self::Primary => "W",
            Self::AbsorbedPath => "R",
            Self::Scattered => "B",
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            Self::Primary => Rgb::WHITE,
            Self::AbsorbedPath => Rgb::RED,
            Self::Scattered => Rgb::BLUE,
        }
    }
}

/// Why a segment stopped growing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Reached the right edge of the playfield
    LeftPlayfield,
    /// Absorbed by the sphere
    StruckSphere,
    /// Hit a particle
    Collided,
}

/// Identifier of a segment, unique for the lifetime of a [`crate::Simulation`]
pub type SegmentId = u64;

/// A growing ray segment.
///
/// A segment keeps a fixed start point and angle; only its length grows, by
/// `speed` per frame, until it terminates.
#[derive(Debug, Clone, PartialEq)]
pub struct RaySegment {
    /// Assigned when the segment joins a simulation; 0 until then
    pub id: SegmentId,
    pub start: Point,
    /// Direction in radians, fixed for the lifetime of the segment
    pub angle: f64,
    pub class: RayClass,
    pub can_scatter: bool,
    /// Length growth per frame
    pub speed: f64,
    pub length: f64,
    /// 0 for primary rays, parent generation + 1 for children
    pub generation: u32,
    pub collided: bool,
    pub collision_point: Option<Point>,
    /// Index of the particle that was hit
    pub collision_particle: Option<usize>,
    /// Particle this segment was spawned from; never collided with
    pub ignored_particle: Option<usize>,
    pub terminated: bool,
    pub struck_sphere: bool,
    /// Set once children were spawned, so a segment spawns at most once
    pub scatter_already_spawned: bool,
    pub age_since_termination: u32,
    pub termination: Option<Termination>,
}

impl RaySegment {
    pub fn new(start: Point, angle: f64, class: RayClass, speed: f64, generation: u32) -> Self {
        Self {
            id: 0,
            start,
            angle,
            class,
            can_scatter: class.can_scatter(),
            speed,
            length: 0.0,
            generation,
            collided: false,
            collision_point: None,
            collision_particle: None,
            ignored_particle: None,
            terminated: false,
            struck_sphere: false,
            scatter_already_spawned: false,
            age_since_termination: 0,
            termination: None,
        }
    }

    /// A generation-0 ray leaving the light source
    pub fn primary(start: Point, angle: f64, speed: f64) -> Self {
        Self::new(start, angle, RayClass::Primary, speed, 0)
    }

    pub fn direction(&self) -> DVec2 {
        math::direction(self.angle)
    }

    /// Current endpoint, kept left of `width`.
    ///
    /// `advance` already stops segments at the right edge; the clamp here keeps
    /// draw coordinates on screen regardless.
    pub fn endpoint(&self, width: f64) -> Point {
        let dir = self.direction();
        let end = self.start + dir * self.length;
        if end.x > width && dir.x > EPSILON {
            let t = (width - self.start.x) / dir.x;
            if t < self.length {
                return self.start + dir * t;
            }
        }
        end
    }

    /// True when the segment has collided and still owes its children
    pub fn needs_spawn(&self) -> bool {
        self.collided && !self.scatter_already_spawned && self.can_scatter
    }

    pub(crate) fn terminate(&mut self, reason: Termination) {
        self.terminated = true;
        self.termination = Some(reason);
    }
}
