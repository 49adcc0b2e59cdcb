//! Hydrodynamics errors.

use kn_core::CoreError;
use thiserror::Error;

/// Result type for hydro operations.
pub type HydroResult<T> = Result<T, HydroError>;

/// Errors raised while converting or evolving fluid states.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HydroError {
    /// Negative or zero density/pressure, superluminal momentum, etc.
    #[error("Non-physical state: {what} = {value:.4e}")]
    NonPhysical { what: &'static str, value: f64 },

    /// The primitive recovery iteration did not settle.
    #[error(
        "Primitive recovery failed after {iterations} iterations (D={lab_density:.4e}, S={momentum:.4e}, tau={energy:.4e})"
    )]
    RootFinderFailed {
        iterations: usize,
        lab_density: f64,
        momentum: f64,
        energy: f64,
    },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

impl HydroError {
    /// True for failures the driver may recover from by flooring the zone.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            HydroError::NonPhysical { .. } | HydroError::RootFinderFailed { .. }
        )
    }
}

impl From<HydroError> for CoreError {
    fn from(err: HydroError) -> Self {
        match err {
            HydroError::NonPhysical { what, value } => CoreError::NonFinite { what, value },
            HydroError::RootFinderFailed { .. } => CoreError::Invariant {
                what: "primitive recovery",
            },
            HydroError::InvalidArg { what } => CoreError::InvalidArg { what },
        }
    }
}
