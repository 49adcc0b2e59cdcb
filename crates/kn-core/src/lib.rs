//! kn-core: stable foundation for the kilonova hydrodynamics code.
//!
//! Contains:
//! - units (uom quantities in cgs + physical constants)
//! - numeric (tolerances + float helpers)
//! - ids (block lattice indices)
//! - timing (wall-clock timers for throughput reporting)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod timing;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
