//! Time integration of the radial relativistic hydro equations on a block
//! mesh with excising boundaries.
//!
//! Provides:
//! - per-block PLM + Riemann-solver flux update in spherical geometry
//! - RK1 / RK2 stepping with fixed or adaptive Courant time step
//! - density and pressure floors with divergence detection
//! - boundary motion, block excision and growth
//! - a driver that runs the loop on a rayon pool and fires recurring tasks

pub mod block;
pub mod clock;
pub mod driver;
pub mod error;
pub mod ledger;
pub mod products;
pub mod scheme;
pub mod state;
pub mod tasks;

pub use block::{Block, Ghosts, NUM_GUARD, StageReport};
pub use clock::RunClock;
pub use driver::{Driver, RunControl, RunOutcome, RunSummary, Setup, StepReport, StopHandle};
pub use error::{SimError, SimResult};
pub use ledger::MassLedger;
pub use products::{BlockProducts, Products};
pub use scheme::{Floors, HydroScheme, IntegratorType};
pub use state::State;
pub use tasks::{NoOutput, Progress, RecurringTask, Snapshot, TaskHandler, Tasks};
