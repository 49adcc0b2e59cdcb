//! Error types for mesh operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    #[error("Boundary collision: inner radius {inner:.6e} >= outer radius {outer:.6e}")]
    BoundaryCollision { inner: f64, outer: f64 },

    #[error("Inner boundary cannot move inward: inner_excision_speed = {speed:.6e} cm/s")]
    InwardExcision { speed: f64 },

    #[error("Invalid mesh geometry: {what}")]
    InvalidGeometry { what: &'static str },
}

pub type MeshResult<T> = Result<T, MeshError>;

impl From<kn_core::CoreError> for MeshError {
    fn from(e: kn_core::CoreError) -> Self {
        match e {
            kn_core::CoreError::NonFinite { what, .. }
            | kn_core::CoreError::InvalidArg { what }
            | kn_core::CoreError::Invariant { what } => MeshError::InvalidGeometry { what },
        }
    }
}
