use super::{CollisionMode, RetentionPolicy};
use crate::error::{RayleighError, Result};
use std::f64::consts::FRAC_PI_8;

/// Deepest scattering generation that may still be produced
pub const MAX_GENERATION: u32 = 2;

/// Angular deltas (radians) applied to the parent angle for each scattered child
pub const SCATTER_OFFSETS: [f64; 8] = [-0.5, -0.35, -0.2, -0.05, 0.05, 0.2, 0.35, 0.5];

/// Configuration descriptor for a scattering simulation
#[derive(Debug, Clone)]
pub struct SimulationDesc {
    /// Number of particles placed in the annulus around the sphere
    pub particle_count: usize,
    /// Interaction radius of every particle
    pub particle_radius: f64,
    /// Radius of the absorbing sphere
    pub sphere_radius: f64,
    /// Outer radius of the placement annulus, as a multiple of `sphere_radius`
    pub outer_radius_factor: f64,
    /// Drawing radius of the light source; the source sits this far from the left edge
    pub source_radius: f64,
    /// Number of primary rays launched at start
    pub primary_ray_count: usize,
    /// Half-angle (radians) of the launch cone around the +x axis
    pub launch_cone: f64,
    /// Length growth per frame of primary rays (children inherit it)
    pub primary_speed: f64,
    /// Scattering stops once a segment reaches this generation
    pub max_generation: u32,
    /// Angular deltas for scattered children
    pub scatter_offsets: Vec<f64>,
    /// Distance from the collision point at which children start
    pub scatter_offset_distance: f64,
    /// Frame rate the animation is paced at
    pub target_fps: u32,
    /// Stroke width of ray segments
    pub line_width: f32,
    /// Resource limit on the active segment set
    pub retention: RetentionPolicy,
    /// Particle collision test
    pub collision_mode: CollisionMode,
    /// Fixed RNG seed (None draws one from the OS)
    pub seed: Option<u64>,
    /// Upper bound on rejection-sampling draws while placing particles
    pub max_placement_attempts: usize,
}

impl Default for SimulationDesc {
    fn default() -> Self {
        Self {
            particle_count: 200,
            particle_radius: 10.0,
            sphere_radius: 200.0,
            outer_radius_factor: 2.0,
            source_radius: 50.0,
            primary_ray_count: 30,
            launch_cone: FRAC_PI_8,
            primary_speed: 5.0,
            max_generation: MAX_GENERATION,
            scatter_offsets: SCATTER_OFFSETS.to_vec(),
            scatter_offset_distance: 5.0,
            target_fps: 60,
            line_width: 2.0,
            retention: RetentionPolicy::KeepAll,
            collision_mode: CollisionMode::Discrete,
            seed: None,
            max_placement_attempts: 1_000_000,
        }
    }
}

impl SimulationDesc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    pub fn particle_radius(mut self, radius: f64) -> Self {
        self.particle_radius = radius;
        self
    }

    pub fn sphere_radius(mut self, radius: f64) -> Self {
        self.sphere_radius = radius;
        self
    }

    pub fn primary_ray_count(mut self, count: usize) -> Self {
        self.primary_ray_count = count;
        self
    }

    pub fn primary_speed(mut self, speed: f64) -> Self {
        self.primary_speed = speed;
        self
    }

    pub fn max_generation(mut self, generation: u32) -> Self {
        self.max_generation = generation;
        self
    }

    pub fn retention(mut self, policy: RetentionPolicy) -> Self {
        self.retention = policy;
        self
    }

    pub fn collision_mode(mut self, mode: CollisionMode) -> Self {
        self.collision_mode = mode;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Outer bound of the placement annulus
    pub fn outer_radius(&self) -> f64 {
        self.sphere_radius * self.outer_radius_factor
    }

    /// Seconds between two simulation steps
    pub fn frame_interval(&self) -> f64 {
        1.0 / self.target_fps.max(1) as f64
    }

    /// Checks the descriptor for values the simulation cannot run with.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("particle_radius", self.particle_radius),
            ("sphere_radius", self.sphere_radius),
            ("primary_speed", self.primary_speed),
            ("scatter_offset_distance", self.scatter_offset_distance),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(RayleighError::Configuration(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }

        if !(self.outer_radius_factor.is_finite() && self.outer_radius_factor >= 1.0) {
            return Err(RayleighError::Configuration(format!(
                "outer_radius_factor must be at least 1.0, got {}",
                self.outer_radius_factor
            )));
        }

        if !(self.launch_cone.is_finite() && self.launch_cone >= 0.0) {
            return Err(RayleighError::Configuration(format!(
                "launch_cone must be non-negative, got {}",
                self.launch_cone
            )));
        }

        if self.source_radius < 0.0 {
            return Err(RayleighError::Configuration(format!(
                "source_radius must be non-negative, got {}",
                self.source_radius
            )));
        }

        if self.scatter_offsets.is_empty() {
            return Err(RayleighError::Configuration(
                "scatter_offsets must not be empty".to_string(),
            ));
        }

        if self.target_fps == 0 {
            return Err(RayleighError::Configuration(
                "target_fps must be greater than zero".to_string(),
            ));
        }

        if self.particle_count > 0 && self.max_placement_attempts == 0 {
            return Err(RayleighError::Configuration(
                "max_placement_attempts must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let desc = SimulationDesc::default();
        assert_eq!(desc.particle_count, 200);
        assert_eq!(desc.particle_radius, 10.0);
        assert_eq!(desc.sphere_radius, 200.0);
        assert_eq!(desc.outer_radius(), 400.0);
        assert_eq!(desc.primary_ray_count, 30);
        assert_eq!(desc.primary_speed, 5.0);
        assert_eq!(desc.max_generation, 2);
        assert_eq!(desc.target_fps, 60);
        assert_eq!(desc.scatter_offsets.len(), 8);
        assert!(desc.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let desc = SimulationDesc::new()
            .particle_count(5)
            .sphere_radius(50.0)
            .primary_speed(2.0)
            .seed(7);
        assert_eq!(desc.particle_count, 5);
        assert_eq!(desc.outer_radius(), 100.0);
        assert_eq!(desc.primary_speed, 2.0);
        assert_eq!(desc.seed, Some(7));
    }

    #[test]
    fn test_validation() {
        assert!(SimulationDesc::new().primary_speed(0.0).validate().is_err());
        assert!(SimulationDesc::new().particle_radius(-1.0).validate().is_err());
        assert!(SimulationDesc::new().sphere_radius(f64::NAN).validate().is_err());

        let mut desc = SimulationDesc::default();
        desc.outer_radius_factor = 0.5;
        assert!(desc.validate().is_err());

        let mut desc = SimulationDesc::default();
        desc.scatter_offsets.clear();
        assert!(desc.validate().is_err());

        let mut desc = SimulationDesc::default();
        desc.target_fps = 0;
        assert!(desc.validate().is_err());
    }
}
