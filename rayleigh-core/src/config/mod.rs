mod policy;
mod simulation_desc;

pub use policy::{CollisionMode, RetentionPolicy};
pub use simulation_desc::{MAX_GENERATION, SCATTER_OFFSETS, SimulationDesc};
