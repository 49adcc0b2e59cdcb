//! Error types for the kn-app service layer.

use std::path::PathBuf;

/// Application error wrapping the backend crates' errors for the CLI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Failed to read configuration file: {path}")]
    ConfigurationFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Configuration validation failed: {0}")]
    Validation(String),

    #[error("Run compilation failed: {0}")]
    Compile(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<kn_project::ProjectError> for AppError {
    fn from(err: kn_project::ProjectError) -> Self {
        match err {
            kn_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Configuration(other.to_string()),
        }
    }
}

impl From<kn_project::ValidationError> for AppError {
    fn from(err: kn_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<kn_sim::SimError> for AppError {
    fn from(err: kn_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}

impl From<kn_results::ResultsError> for AppError {
    fn from(err: kn_results::ResultsError) -> Self {
        AppError::Results(err.to_string())
    }
}
