use std::path::PathBuf;

use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid model parameter: {what}")]
    InvalidParameter { what: String },

    #[error("Initial data table {path}: {source}")]
    TableIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Initial data table {path} is malformed: {source}")]
    TableFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Initial data table is inconsistent: {what}")]
    InvalidTable { what: &'static str },
}

impl ModelError {
    pub(crate) fn invalid(what: impl Into<String>) -> Self {
        ModelError::InvalidParameter { what: what.into() }
    }
}
