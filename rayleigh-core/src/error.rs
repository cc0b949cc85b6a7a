//! Error types for Rayleigh

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RayleighError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Particle placement error: {0}")]
    Placement(String),
}

pub type Result<T> = std::result::Result<T, RayleighError>;
