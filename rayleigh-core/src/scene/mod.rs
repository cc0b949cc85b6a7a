//! Static scene description: light source, absorbing sphere and particles.
//!
//! A [`Scene`] is built once when the simulation starts and never changes
//! afterwards. Its layout follows the playfield size:
//!
//! - the light source sits on the left edge, vertically centred, offset by its
//!   own drawing radius;
//! - the absorbing sphere is centred at two thirds of the width, mid-height;
//! - particles are scattered through the annulus between the sphere and a
//!   larger design circle using rejection sampling.
//!
//! # Example
//!
//! ```
//! use rayleigh_core::config::SimulationDesc;
//! use rayleigh_core::scene::{Bounds, Scene};
//! use rand::SeedableRng;
//!
//! let desc = SimulationDesc::default();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(3);
//! let scene = Scene::generate(&desc, Bounds::new(1920.0, 1080.0), &mut rng)?;
//! assert_eq!(scene.particles().len(), 200);
//! # Ok::<(), rayleigh_core::RayleighError>(())
//! ```

pub mod placement;
pub mod sphere;

pub use placement::Annulus;
pub use sphere::Sphere;

use crate::config::SimulationDesc;
use crate::error::{RayleighError, Result};
use crate::math::{DVec2, Point};
use rand::Rng;

/// Size of the playfield in screen units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Immutable geometry shared by every segment of a simulation
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    source: Point,
    source_radius: f64,
    sphere: Sphere,
    outer_radius: f64,
    particles: Vec<Point>,
    particle_radius: f64,
    bounds: Bounds,
}

impl Scene {
    /// Lays the scene out for `bounds` and places particles with `rng`.
    ///
    /// Every generated particle lies at a distance `d` from the sphere centre
    /// with `sphere_radius <= d <= outer_radius`.
    pub fn generate<R: Rng + ?Sized>(
        desc: &SimulationDesc,
        bounds: Bounds,
        rng: &mut R,
    ) -> Result<Self> {
        desc.validate()?;
        if !(bounds.width > 0.0 && bounds.height > 0.0) {
            return Err(RayleighError::Configuration(format!(
                "playfield must have a positive size, got {}x{}",
                bounds.width, bounds.height
            )));
        }

        let source = DVec2::new(desc.source_radius, (bounds.height / 2.0).floor());
        let sphere_center = DVec2::new(
            (2.0 * bounds.width / 3.0).floor(),
            (bounds.height / 2.0).floor(),
        );
        if sphere_center.x <= source.x + desc.source_radius {
            return Err(RayleighError::Configuration(format!(
                "playfield {}x{} is too narrow: sphere centre x={} lies within the source disc",
                bounds.width, bounds.height, sphere_center.x
            )));
        }

        let annulus = Annulus::new(sphere_center, desc.sphere_radius, desc.outer_radius());
        let particles = annulus.sample(desc.particle_count, desc.max_placement_attempts, rng)?;

        log::info!(
            "Scene generated: {}x{} playfield, sphere at ({:.0}, {:.0}) r={}, {} particles",
            bounds.width,
            bounds.height,
            sphere_center.x,
            sphere_center.y,
            desc.sphere_radius,
            particles.len()
        );

        Ok(Self {
            source,
            source_radius: desc.source_radius,
            sphere: Sphere::new(sphere_center, desc.sphere_radius),
            outer_radius: desc.outer_radius(),
            particles,
            particle_radius: desc.particle_radius,
            bounds,
        })
    }

    /// Builds a scene from explicit positions.
    ///
    /// The annulus invariant is not checked, so callers can place particles
    /// anywhere (e.g. directly on a ray path).
    pub fn with_particles(
        source: Point,
        sphere: Sphere,
        particles: Vec<Point>,
        particle_radius: f64,
        bounds: Bounds,
    ) -> Self {
        Self {
            source,
            source_radius: 0.0,
            sphere,
            outer_radius: sphere.radius * 2.0,
            particles,
            particle_radius,
            bounds,
        }
    }

    pub fn source(&self) -> Point {
        self.source
    }

    pub fn source_radius(&self) -> f64 {
        self.source_radius
    }

    pub fn sphere(&self) -> &Sphere {
        &self.sphere
    }

    pub fn outer_radius(&self) -> f64 {
        self.outer_radius
    }

    pub fn particles(&self) -> &[Point] {
        &self.particles
    }

    pub fn particle_radius(&self) -> f64 {
        self.particle_radius
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Right edge of the playfield; segments stop when they reach it
    pub fn width(&self) -> f64 {
        self.bounds.width
    }
}
