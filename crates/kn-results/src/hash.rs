//! Content digest identifying a run configuration.

use kn_project::Configuration;
use sha2::{Digest, Sha256};

/// SHA-256 of the configuration and solver version, as lowercase hex.
///
/// The output directory is left out so that the same physics run written to
/// two places has the same digest.
pub fn config_digest(config: &Configuration, solver_version: &str) -> String {
    let mut hasher = Sha256::new();

    let physics = (&config.hydro, &config.model, &config.mesh);
    let physics_json = serde_json::to_string(&physics).unwrap_or_default();
    hasher.update(physics_json.as_bytes());

    let control = &config.control;
    let control_json =
        serde_json::to_string(&(control.start_time, control.final_time)).unwrap_or_default();
    hasher.update(control_json.as_bytes());

    hasher.update(solver_version.as_bytes());

    format!("{:x}", hasher.finalize())
}
