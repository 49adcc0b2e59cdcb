//! Configuration loading, validation and introspection.

use std::path::Path;

use kn_project::Configuration;

use crate::error::{AppError, AppResult};

/// One-line description of a configuration for listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationSummary {
    pub model: &'static str,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub num_polar_zones: usize,
    pub block_size: usize,
    pub final_time: f64,
    pub checkpoint_interval: f64,
}

/// Load and validate a YAML or JSON configuration.
pub fn load_configuration(path: &Path) -> AppResult<Configuration> {
    if !path.exists() {
        return Err(AppError::ConfigurationFileRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        });
    }
    Ok(kn_project::load(path)?)
}

pub fn validate_configuration(config: &Configuration) -> AppResult<()> {
    kn_project::validate_config(config)?;
    Ok(())
}

pub fn summarize(config: &Configuration) -> ConfigurationSummary {
    ConfigurationSummary {
        model: config.model.name(),
        inner_radius: config.mesh.inner_radius,
        outer_radius: config.mesh.outer_radius,
        num_polar_zones: config.mesh.num_polar_zones,
        block_size: config.mesh.block_size,
        final_time: config.control.final_time,
        checkpoint_interval: config.control.checkpoint_interval,
    }
}
