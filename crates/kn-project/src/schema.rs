//! Configuration schema definitions.
//!
//! Every table rejects unknown keys, and enumerated values are closed sets.

use std::path::PathBuf;

use kn_hydro::RiemannSolverKind;
use kn_models::Scenario;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Configuration {
    pub hydro: Hydro,
    pub model: Scenario,
    pub mesh: MeshDef,
    pub control: ControlDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Hydro {
    Relativistic(RelativisticHydro),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RungeKuttaOrder {
    RK1,
    RK2,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RelativisticHydro {
    pub gamma_law_index: f64,
    pub plm_theta: f64,
    pub cfl_number: f64,
    pub runge_kutta_order: RungeKuttaOrder,
    pub riemann_solver: RiemannSolverKind,
    #[serde(default)]
    pub adaptive_time_step: bool,
    #[serde(default = "default_density_floor")]
    pub density_floor: f64,
    #[serde(default = "default_pressure_floor")]
    pub pressure_floor: f64,
    #[serde(default = "default_max_consecutive_floors")]
    pub max_consecutive_floors: u32,
}

fn default_density_floor() -> f64 {
    1e-20
}

fn default_pressure_floor() -> f64 {
    1e-24
}

fn default_max_consecutive_floors() -> u32 {
    100
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MeshDef {
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub inner_excision_speed: f64,
    pub outer_excision_speed: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excision_delay: Option<f64>,
    pub reference_radius: f64,
    pub num_polar_zones: usize,
    pub block_size: usize,
    /// Polar angle of the simulated ray, measured from the jet axis
    #[serde(default)]
    pub polar_angle: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ControlDef {
    pub final_time: f64,
    #[serde(default)]
    pub start_time: f64,
    pub checkpoint_interval: f64,
    pub output_directory: PathBuf,
    #[serde(default)]
    pub num_threads: Option<usize>,
    #[serde(default = "default_fold")]
    pub fold: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products_interval: Option<f64>,
}

fn default_fold() -> usize {
    10
}

impl Configuration {
    pub fn relativistic(&self) -> &RelativisticHydro {
        match &self.hydro {
            Hydro::Relativistic(h) => h,
        }
    }
}
