//! Output directory layout.
//!
//! ```text
//! <output_directory>/
//!   manifest.json
//!   chkpt.0000.json
//!   prods.0000.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use kn_project::Configuration;
use kn_sim::Products;
use serde::Serialize;
use tracing::debug;

use crate::hash::config_digest;
use crate::types::{
    Checkpoint, CheckpointEntry, CheckpointRef, ProductsRecord, RunManifest,
};
use crate::{ResultsError, ResultsResult};

const CHECKPOINT_PREFIX: &str = "chkpt.";
const PRODUCTS_PREFIX: &str = "prods.";
const EXTENSION: &str = ".json";

pub fn checkpoint_file_name(number: usize) -> String {
    format!("{CHECKPOINT_PREFIX}{number:04}{EXTENSION}")
}

pub fn products_file_name(number: usize) -> String {
    format!("{PRODUCTS_PREFIX}{number:04}{EXTENSION}")
}

fn parse_number(file_name: &str, prefix: &str) -> Option<usize> {
    file_name
        .strip_prefix(prefix)?
        .strip_suffix(EXTENSION)?
        .parse()
        .ok()
}

#[derive(Clone, Debug)]
pub struct CheckpointStore {
    root_dir: PathBuf,
}

impl CheckpointStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn checkpoint_path(&self, number: usize) -> PathBuf {
        self.root_dir.join(checkpoint_file_name(number))
    }

    pub fn products_path(&self, number: usize) -> PathBuf {
        self.root_dir.join(products_file_name(number))
    }

    /// Write JSON to a sibling temporary file and rename it into place, so a
    /// reader never sees a half-written checkpoint.
    fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> ResultsResult<()> {
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        let content = serde_json::to_vec(value)?;
        fs::write(&tmp, content)?;
        fs::rename(&tmp, path)?;
        debug!(path = %path.display(), "wrote file");
        Ok(())
    }

    pub fn save_checkpoint(
        &self,
        number: usize,
        checkpoint: CheckpointRef<'_>,
    ) -> ResultsResult<PathBuf> {
        let path = self.checkpoint_path(number);
        self.write_json(&path, &checkpoint)?;
        Ok(path)
    }

    pub fn save_products(&self, number: usize, products: &Products) -> ResultsResult<PathBuf> {
        let path = self.products_path(number);
        let record = ProductsRecord {
            number,
            products: products.clone(),
        };
        self.write_json(&path, &record)?;
        Ok(path)
    }

    pub fn save_manifest(
        &self,
        config: &Configuration,
        solver_version: &str,
    ) -> ResultsResult<RunManifest> {
        let manifest = RunManifest {
            config_digest: config_digest(config, solver_version),
            model: config.model.name().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            solver_version: solver_version.to_string(),
            start_time: config.control.start_time,
            final_time: config.control.final_time,
        };
        let path = self.root_dir.join("manifest.json");
        let content = serde_json::to_string_pretty(&manifest)?;
        fs::write(path, content)?;
        Ok(manifest)
    }

    pub fn load_manifest(&self) -> ResultsResult<RunManifest> {
        let path = self.root_dir.join("manifest.json");
        if !path.exists() {
            return Err(ResultsError::CheckpointNotFound {
                path: path.display().to_string(),
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn load_products(&self, number: usize) -> ResultsResult<ProductsRecord> {
        let path = self.products_path(number);
        if !path.exists() {
            return Err(ResultsError::CheckpointNotFound {
                path: path.display().to_string(),
            });
        }
        let content = fs::read(path)?;
        Ok(serde_json::from_slice(&content)?)
    }

    /// Checkpoints in the directory, ordered by number.
    pub fn list_checkpoints(&self) -> ResultsResult<Vec<CheckpointEntry>> {
        let mut entries = Vec::new();
        if !self.root_dir.exists() {
            return Ok(entries);
        }
        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if let Some(number) = parse_number(&name, CHECKPOINT_PREFIX) {
                entries.push(CheckpointEntry {
                    number,
                    path: entry.path(),
                });
            }
        }
        entries.sort_by_key(|e| e.number);
        Ok(entries)
    }

    pub fn latest_checkpoint(&self) -> ResultsResult<Option<CheckpointEntry>> {
        Ok(self.list_checkpoints()?.pop())
    }
}

/// Read a checkpoint file from anywhere on disk.
pub fn load_checkpoint(path: &Path) -> ResultsResult<Checkpoint> {
    if !path.exists() {
        return Err(ResultsError::CheckpointNotFound {
            path: path.display().to_string(),
        });
    }
    let content = fs::read(path)?;
    Ok(serde_json::from_slice(&content)?)
}
