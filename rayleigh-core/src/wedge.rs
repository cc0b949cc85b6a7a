//! Per-sector absorption statistics.
//!
//! The sphere boundary is split into [`WEDGE_COUNT`] equal sectors starting at
//! angle 0 (pointing right) and running clockwise on screen, since y grows
//! downwards. Every segment that struck the sphere is counted in the sector
//! its endpoint lies in, per ray class.

use crate::math::{Point, normalize_angle};
use crate::ray::{RayClass, RaySegment};
use crate::scene::Scene;
use std::f64::consts::{FRAC_PI_4, FRAC_PI_8};
use std::ops::{Add, AddAssign};

pub const WEDGE_COUNT: usize = 8;

/// Angular width of one sector
pub const WEDGE_ANGLE: f64 = FRAC_PI_4;

/// Letters drawn inside the sphere, one per sector
pub const WEDGE_LABELS: [&str; WEDGE_COUNT] = ["a", "b", "c", "d", "e", "f", "g", "h"];

/// Sector index of `point` as seen from `center`, always in `0..WEDGE_COUNT`.
pub fn sector_index(center: Point, point: Point) -> usize {
    let offset = point - center;
    let angle = normalize_angle(offset.y.atan2(offset.x));
    (angle / WEDGE_ANGLE).floor() as usize % WEDGE_COUNT
}

/// Angle of the boundary that opens sector `index`
pub fn sector_start_angle(index: usize) -> f64 {
    index as f64 * WEDGE_ANGLE
}

/// Angle halfway through sector `index`
pub fn sector_mid_angle(index: usize) -> f64 {
    sector_start_angle(index) + FRAC_PI_8
}

/// Strike counts for one sector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassCounts {
    pub primary: u32,
    pub absorbed_path: u32,
    pub scattered: u32,
}

impl ClassCounts {
    pub fn get(&self, class: RayClass) -> u32 {
        match class {
            RayClass::Primary => self.primary,
            RayClass::AbsorbedPath => self.absorbed_path,
            RayClass::Scattered => self.scattered,
        }
    }

    pub fn increment(&mut self, class: RayClass) {
        match class {
            RayClass::Primary => self.primary += 1,
            RayClass::AbsorbedPath => self.absorbed_path += 1,
            RayClass::Scattered => self.scattered += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.primary + self.absorbed_path + self.scattered
    }

    /// Counter text, e.g. `W:3 R:1 B:12`
    pub fn label(&self) -> String {
        RayClass::ALL
            .iter()
            .map(|class| format!("{}:{}", class.tally_label(), self.get(*class)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Add for ClassCounts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            primary: self.primary + rhs.primary,
            absorbed_path: self.absorbed_path + rhs.absorbed_path,
            scattered: self.scattered + rhs.scattered,
        }
    }
}

/// Counts for all sectors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WedgeTally {
    sectors: [ClassCounts; WEDGE_COUNT],
}

impl WedgeTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tallies every sphere strike in `segments` from scratch.
    pub fn compute<'a, I>(segments: I, scene: &Scene) -> Self
    where
        I: IntoIterator<Item = &'a RaySegment>,
    {
        let mut tally = Self::new();
        for segment in segments {
            tally.record(segment, scene);
        }
        tally
    }

    /// Counts `segment` if it struck the sphere; returns whether it was counted.
    pub fn record(&mut self, segment: &RaySegment, scene: &Scene) -> bool {
        if !segment.struck_sphere {
            return false;
        }
        let endpoint = segment.endpoint(scene.width());
        let index = sector_index(scene.sphere().center, endpoint);
        self.sectors[index].increment(segment.class);
        true
    }

    pub fn sector(&self, index: usize) -> &ClassCounts {
        &self.sectors[index]
    }

    pub fn sectors(&self) -> &[ClassCounts; WEDGE_COUNT] {
        &self.sectors
    }

    pub fn total(&self) -> u32 {
        self.sectors.iter().map(ClassCounts::total).sum()
    }
}

impl Add for WedgeTally {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl AddAssign for WedgeTally {
    fn add_assign(&mut self, rhs: Self) {
        for (lhs, rhs) in self.sectors.iter_mut().zip(rhs.sectors) {
            *lhs = *lhs + rhs;
        }
    }
}
