#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use kn_models::Scenario;
use kn_project::Configuration;

pub fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}_{}", prefix, std::process::id(), nanos));
    dir
}

pub fn preset_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../presets")
        .join(name)
}

/// Load a preset with every file it touches redirected into `dir`.
pub fn preset_in(name: &str, dir: &Path) -> Configuration {
    let mut config = kn_app::load_configuration(&preset_path(name)).expect("preset loads");
    config.control.output_directory = dir.join("output");
    if let Scenario::HaloKilonova(model) = &mut config.model {
        model.initial_data_table = Some(dir.join("initial_data.json"));
    }
    config
}
