//! Mildly relativistic shell launched into a pre-existing halo.
//!
//! The shell sits between `launch_radius` and `launch_radius +
//! shell_thickness`, carries `shell_mass` and `kinetic_energy`, and coasts
//! through an `r⁻²` halo extending to `radial_distance`. Beyond the halo a
//! much thinner wind continues the same power law.

use std::f64::consts::PI;
use std::path::PathBuf;
use std::sync::Arc;

use kn_core::{constants, erg, grams};
use kn_hydro::Primitive;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ModelError, ModelResult};
use crate::model::InitialModel;
use crate::table::InitialDataTable;

/// Pressure over ρc² everywhere in the setup.
const UNIFORM_TEMPERATURE: f64 = 1e-3;

/// Wind density relative to the halo density at the same radius.
const WIND_DENSITY_RATIO: f64 = 1e-3;

/// Samples per decade of radius in a generated initial data table.
const TABLE_SAMPLES_PER_DECADE: f64 = 2048.0;

fn default_halo_density_ratio() -> f64 {
    1e-3
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HaloKilonova {
    /// Kinetic energy of the shell (erg)
    pub kinetic_energy: f64,
    /// Mass of the shell (g)
    pub shell_mass: f64,
    /// Inner radius of the shell at launch (cm)
    pub launch_radius: f64,
    /// Radial thickness of the shell (cm)
    pub shell_thickness: f64,
    /// Outer edge of the halo (cm)
    pub radial_distance: f64,
    /// Tabulated profile read at startup, or written there if missing
    #[serde(default)]
    pub initial_data_table: Option<PathBuf>,
    /// Halo density at the launch radius relative to the shell density
    #[serde(default = "default_halo_density_ratio")]
    pub halo_density_ratio: f64,
    #[serde(skip)]
    table: Option<Arc<InitialDataTable>>,
}

impl PartialEq for HaloKilonova {
    fn eq(&self, other: &Self) -> bool {
        self.kinetic_energy == other.kinetic_energy
            && self.shell_mass == other.shell_mass
            && self.launch_radius == other.launch_radius
            && self.shell_thickness == other.shell_thickness
            && self.radial_distance == other.radial_distance
            && self.initial_data_table == other.initial_data_table
            && self.halo_density_ratio == other.halo_density_ratio
    }
}

impl HaloKilonova {
    pub fn new(
        kinetic_energy: f64,
        shell_mass: f64,
        launch_radius: f64,
        shell_thickness: f64,
        radial_distance: f64,
    ) -> Self {
        Self {
            kinetic_energy,
            shell_mass,
            launch_radius,
            shell_thickness,
            radial_distance,
            initial_data_table: None,
            halo_density_ratio: default_halo_density_ratio(),
            table: None,
        }
    }

    pub fn shell_lorentz_factor(&self) -> f64 {
        constants::lorentz_factor_from_kinetic(erg(self.kinetic_energy), grams(self.shell_mass))
    }

    pub fn shell_gamma_beta(&self) -> f64 {
        let w = self.shell_lorentz_factor();
        (w * w - 1.0).sqrt()
    }

    /// Comoving density of the shell (g/cm³).
    pub fn shell_density(&self) -> f64 {
        let r0 = self.launch_radius;
        let r1 = r0 + self.shell_thickness;
        self.shell_mass / (4.0 / 3.0 * PI * (r1 * r1 * r1 - r0 * r0 * r0))
    }

    pub fn in_shell(&self, r: f64) -> bool {
        r >= self.launch_radius && r < self.launch_radius + self.shell_thickness
    }

    pub fn table(&self) -> Option<&InitialDataTable> {
        self.table.as_deref()
    }

    /// The closed-form profile.
    pub fn analytic_state(&self, r: f64) -> Primitive {
        let (d, u, s) = if self.in_shell(r) {
            (self.shell_density(), self.shell_gamma_beta(), 1.0)
        } else {
            let halo = self.shell_density()
                * self.halo_density_ratio
                * (r / self.launch_radius).powi(-2);
            if r < self.radial_distance {
                (halo, 0.0, 0.0)
            } else {
                (halo * WIND_DENSITY_RATIO, 0.0, 0.0)
            }
        };
        Primitive::new(d, u, d * UNIFORM_TEMPERATURE, s)
    }

    /// Attach the initial data table covering `[r_min, r_max]`, reading it
    /// from `initial_data_table` when the file exists and writing a freshly
    /// tabulated profile there otherwise. Without a configured path the
    /// closed-form profile is used directly.
    pub fn prepare(&mut self, r_min: f64, r_max: f64) -> ModelResult<()> {
        let Some(path) = self.initial_data_table.clone() else {
            return Ok(());
        };
        let table = if path.exists() {
            let table = InitialDataTable::load(&path)?;
            info!(path = %path.display(), samples = table.radius.len(), "loaded initial data table");
            table
        } else {
            let decades = (r_max / r_min).log10().max(1.0);
            let samples = (decades * TABLE_SAMPLES_PER_DECADE).ceil() as usize + 1;
            let table =
                InitialDataTable::tabulate(r_min, r_max, samples, |r| self.analytic_state(r))?;
            table.save(&path)?;
            info!(path = %path.display(), samples, "wrote initial data table");
            table
        };
        self.table = Some(Arc::new(table));
        Ok(())
    }
}

impl InitialModel for HaloKilonova {
    fn validate(&self) -> ModelResult<()> {
        let positive = [
            ("halo_kilonova.kinetic_energy", self.kinetic_energy),
            ("halo_kilonova.shell_mass", self.shell_mass),
            ("halo_kilonova.launch_radius", self.launch_radius),
            ("halo_kilonova.shell_thickness", self.shell_thickness),
            ("halo_kilonova.radial_distance", self.radial_distance),
            ("halo_kilonova.halo_density_ratio", self.halo_density_ratio),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ModelError::invalid(format!("{name} must be positive, got {value}")));
            }
        }
        if self.launch_radius + self.shell_thickness > self.radial_distance {
            return Err(ModelError::invalid(
                "halo_kilonova shell must lie inside radial_distance",
            ));
        }
        Ok(())
    }

    /// The profile is static in time; the table takes precedence where it
    /// covers the radius.
    fn primitive_at(&self, coordinate: (f64, f64), _time: f64) -> Primitive {
        let r = coordinate.0;
        self.table
            .as_ref()
            .and_then(|t| t.sample(r))
            .unwrap_or_else(|| self.analytic_state(r))
    }

    fn scalar_at(&self, coordinate: (f64, f64), time: f64) -> f64 {
        self.primitive_at(coordinate, time).scalar
    }

    /// The halo at rest, held at its initial state.
    fn inner_boundary_condition(&self, coordinate: (f64, f64), time: f64) -> Primitive {
        self.primitive_at(coordinate, time)
    }
}
