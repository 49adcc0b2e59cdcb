//! Application service layer shared by the command-line front end and the
//! integration tests.
//!
//! Loads configurations and checkpoints, compiles them into a driver, runs
//! it with checkpoint and product output, and reports progress.

pub mod compile;
pub mod error;
pub mod progress;
pub mod project_service;
pub mod run_service;

pub use compile::{CompiledRun, compile, hydro_scheme, mesh_spec, run_control};
pub use error::{AppError, AppResult};
pub use kn_sim::{RunOutcome, RunSummary, StopHandle};
pub use progress::{RunProgress, RunProgressEvent, RunStage};
pub use project_service::{ConfigurationSummary, load_configuration, summarize, validate_configuration};
pub use run_service::{
    RunOptions, RunResponse, StoreHandler, resume_from_checkpoint, resume_from_checkpoint_with_progress,
    run_configuration, run_configuration_with_progress,
};
