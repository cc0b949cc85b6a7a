//! # Rayleigh Core
//!
//! Simulation engine for an animated Rayleigh scattering visualization: a
//! point light source emits rays that grow across the playfield, scatter off
//! randomly placed particles and are absorbed by a target sphere, whose
//! boundary is split into eight sectors with live per-class strike counts.
//!
//! ## Quick Start
//!
//! ```no_run
//! use rayleigh_core::*;
//!
//! // Scene layout follows the playfield size
//! let desc = SimulationDesc::default();
//! let mut simulation = Simulation::new(desc, Bounds::new(1920.0, 1080.0))?;
//!
//! // One call per animation frame
//! loop {
//!     let report = simulation.step();
//!     for event in simulation.poll_events() {
//!         if let SimulationEvent::SphereStruck { sector, class, .. } = event {
//!             println!("{:?} ray absorbed in sector {}", class, sector);
//!         }
//!     }
//!     if simulation.is_settled() {
//!         println!("settled after {} frames", report.frame);
//!         break;
//!     }
//! }
//!
//! for (index, counts) in simulation.tally().sectors().iter().enumerate() {
//!     println!("{}: {}", wedge::WEDGE_LABELS[index], counts.label());
//! }
//! # Ok::<(), RayleighError>(())
//! ```
//!
//! ## Key Components
//!
//! - **[`Simulation`]**: owned simulation context, stepped once per frame
//! - **[`Scene`]**: light source, absorbing sphere and particle layout
//! - **[`RaySegment`]** / **[`RayClass`]**: growing rays and their class rules
//! - **[`ray::advance`]** / **[`ray::spawn`]**: propagation and scattering
//! - **[`WedgeTally`]**: per-sector, per-class absorption counts
//! - **[`render::Canvas`]**: drawing contract implemented by front ends
//!
//! ## Frame model
//!
//! Everything runs on the caller's thread. Children spawned during a step are
//! buffered and appended once every pre-existing segment has been advanced, so
//! a child first moves on the step after its parent collided.

pub mod config;
pub mod error;
pub mod events;
pub mod math;
pub mod ray;
pub mod render;
pub mod scene;
pub mod wedge;
pub mod world;

pub use config::{CollisionMode, RetentionPolicy, SimulationDesc};
pub use error::RayleighError;
pub use events::{FrameTimingEvent, SimulationEvent};
pub use ray::{RayClass, RaySegment, SegmentId, Termination};
pub use scene::{Bounds, Scene, Sphere};
pub use wedge::{ClassCounts, WedgeTally};
pub use world::{FrameReport, Simulation};
