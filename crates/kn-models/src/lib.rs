//! kn-models: physical setups for the radial hydro code.
//!
//! Each setup provides the initial state at any radius and the state fed in
//! through the inner boundary. Setups are selected by the `model` key of the
//! configuration and dispatched through the closed [`Scenario`] enum.

pub mod error;
pub mod halo_kilonova;
pub mod jet_in_star;
pub mod model;
pub mod scenario;
pub mod table;

pub use error::{ModelError, ModelResult};
pub use halo_kilonova::HaloKilonova;
pub use jet_in_star::{JetInStar, JetZone};
pub use model::InitialModel;
pub use scenario::Scenario;
pub use table::InitialDataTable;
