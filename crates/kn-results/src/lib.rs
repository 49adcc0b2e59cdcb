//! kn-results: checkpoint, data product and run manifest storage.

pub mod hash;
pub mod store;
pub mod types;

pub use hash::config_digest;
pub use store::{CheckpointStore, checkpoint_file_name, load_checkpoint, products_file_name};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Checkpoint not found: {path}")]
    CheckpointNotFound { path: String },
}
