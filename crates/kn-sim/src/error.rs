//! Error types for simulation operations.

use thiserror::Error;

/// Errors that end a run.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Simulation diverged: zone at r = {radius:.6e} floored on {consecutive} consecutive steps")]
    Diverged { radius: f64, consecutive: u32 },

    #[error("Boundary collision: inner radius {inner:.6e} >= outer radius {outer:.6e}")]
    BoundaryCollision { inner: f64, outer: f64 },

    #[error("Mesh error: {0}")]
    Mesh(kn_mesh::MeshError),

    #[error("Model error: {0}")]
    Model(#[from] kn_models::ModelError),

    #[error("Hydro error: {0}")]
    Hydro(#[from] kn_hydro::HydroError),

    #[error("Thread pool error: {message}")]
    ThreadPool { message: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<kn_mesh::MeshError> for SimError {
    fn from(e: kn_mesh::MeshError) -> Self {
        match e {
            kn_mesh::MeshError::BoundaryCollision { inner, outer } => {
                SimError::BoundaryCollision { inner, outer }
            }
            other => SimError::Mesh(other),
        }
    }
}

impl From<rayon::ThreadPoolBuildError> for SimError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        SimError::ThreadPool {
            message: e.to_string(),
        }
    }
}
