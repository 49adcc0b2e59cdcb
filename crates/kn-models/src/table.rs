//! Tabulated radial profile used to initialize a run reproducibly.

use std::fs;
use std::path::Path;

use kn_hydro::Primitive;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InitialDataTable {
    /// Sample radii (cm), strictly increasing
    pub radius: Vec<f64>,
    /// Primitive state at each sample radius
    pub primitive: Vec<Primitive>,
}

impl InitialDataTable {
    /// Sample `profile` at `num_samples` logarithmically spaced radii spanning
    /// `[r_min, r_max]`.
    pub fn tabulate(
        r_min: f64,
        r_max: f64,
        num_samples: usize,
        profile: impl Fn(f64) -> Primitive,
    ) -> ModelResult<Self> {
        if !(r_min > 0.0 && r_max > r_min) || num_samples < 2 {
            return Err(ModelError::InvalidTable {
                what: "tabulation range must be positive and increasing with two or more samples",
            });
        }
        let dlogr = (r_max / r_min).ln() / (num_samples - 1) as f64;
        let radius: Vec<f64> = (0..num_samples)
            .map(|i| r_min * (i as f64 * dlogr).exp())
            .collect();
        let primitive = radius.iter().map(|&r| profile(r)).collect();
        Ok(Self { radius, primitive })
    }

    pub fn validate(&self) -> ModelResult<()> {
        if self.radius.len() != self.primitive.len() {
            return Err(ModelError::InvalidTable {
                what: "radius and primitive columns differ in length",
            });
        }
        if self.radius.len() < 2 {
            return Err(ModelError::InvalidTable {
                what: "at least two samples are required",
            });
        }
        if self.radius.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(ModelError::InvalidTable {
                what: "radii must be strictly increasing",
            });
        }
        Ok(())
    }

    pub fn covers(&self, r: f64) -> bool {
        match (self.radius.first(), self.radius.last()) {
            (Some(&lo), Some(&hi)) => r >= lo && r <= hi,
            _ => false,
        }
    }

    /// Interpolate linearly in `ln r`. Returns `None` outside the table.
    pub fn sample(&self, r: f64) -> Option<Primitive> {
        if !self.covers(r) {
            return None;
        }
        let i = self.radius.partition_point(|&x| x <= r).min(self.radius.len() - 1);
        let i = i.max(1);
        let (r0, r1) = (self.radius[i - 1], self.radius[i]);
        let (a, b) = (&self.primitive[i - 1], &self.primitive[i]);
        let w = (r / r0).ln() / (r1 / r0).ln();
        let mix = |x: f64, y: f64| x + w * (y - x);
        Some(Primitive::new(
            mix(a.mass_density, b.mass_density),
            mix(a.gamma_beta, b.gamma_beta),
            mix(a.gas_pressure, b.gas_pressure),
            mix(a.scalar, b.scalar),
        ))
    }

    pub fn load(path: &Path) -> ModelResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| ModelError::TableIo {
            path: path.to_path_buf(),
            source,
        })?;
        let table: Self = serde_json::from_str(&text).map_err(|source| ModelError::TableFormat {
            path: path.to_path_buf(),
            source,
        })?;
        table.validate()?;
        Ok(table)
    }

    pub fn save(&self, path: &Path) -> ModelResult<()> {
        let io = |source| ModelError::TableIo {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io)?;
        }
        let text = serde_json::to_string(self).map_err(|source| ModelError::TableFormat {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, text).map_err(io)
    }
}
