//! Persisted record types.

use kn_project::Configuration;
use kn_sim::{Products, State, Tasks};
use serde::{Deserialize, Serialize};

/// Everything needed to resume a run: the configuration it was started
/// with, the full mesh state and the cadence of its recurring tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub configuration: Configuration,
    pub state: State,
    pub tasks: Tasks,
}

/// Borrowed form of [`Checkpoint`], serialized identically.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CheckpointRef<'a> {
    pub configuration: &'a Configuration,
    pub state: &'a State,
    pub tasks: &'a Tasks,
}

impl<'a> From<&'a Checkpoint> for CheckpointRef<'a> {
    fn from(checkpoint: &'a Checkpoint) -> Self {
        Self {
            configuration: &checkpoint.configuration,
            state: &checkpoint.state,
            tasks: &checkpoint.tasks,
        }
    }
}

/// Data products file, tagged with its sequence number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductsRecord {
    pub number: usize,
    pub products: Products,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub config_digest: String,
    pub model: String,
    pub timestamp: String,
    pub solver_version: String,
    pub start_time: f64,
    pub final_time: f64,
}

/// Summary of a checkpoint found on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointEntry {
    pub number: usize,
    pub path: std::path::PathBuf,
}
