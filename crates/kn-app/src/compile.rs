//! Translate a validated configuration into driver inputs.

use kn_mesh::MeshSpec;
use kn_models::Scenario;
use kn_project::{Configuration, RelativisticHydro, RungeKuttaOrder};
use kn_sim::{Floors, HydroScheme, IntegratorType, RunControl, Setup};

use crate::error::{AppError, AppResult};

/// Everything a driver needs to start.
#[derive(Debug, Clone)]
pub struct CompiledRun {
    pub setup: Setup,
    pub scenario: Scenario,
    pub control: RunControl,
}

pub fn compile(config: &Configuration) -> AppResult<CompiledRun> {
    kn_project::validate_config(config)?;
    Ok(CompiledRun {
        setup: Setup {
            scheme: hydro_scheme(config.relativistic())?,
            mesh: mesh_spec(config),
            polar_angle: config.mesh.polar_angle,
            start_time: config.control.start_time,
            num_threads: config.control.num_threads,
        },
        scenario: config.model.clone(),
        control: run_control(config),
    })
}

pub fn hydro_scheme(hydro: &RelativisticHydro) -> AppResult<HydroScheme> {
    let integrator = match hydro.runge_kutta_order {
        RungeKuttaOrder::RK1 => IntegratorType::RK1,
        RungeKuttaOrder::RK2 => IntegratorType::RK2,
    };
    let scheme = HydroScheme::new(
        hydro.gamma_law_index,
        hydro.plm_theta,
        hydro.cfl_number,
        hydro.riemann_solver,
        integrator,
    )
    .map_err(|e| AppError::Compile(e.to_string()))?;
    Ok(scheme
        .with_adaptive_time_step(hydro.adaptive_time_step)
        .with_floors(Floors {
            density_floor: hydro.density_floor,
            pressure_floor: hydro.pressure_floor,
            max_consecutive_floors: hydro.max_consecutive_floors,
        }))
}

pub fn mesh_spec(config: &Configuration) -> MeshSpec {
    let mesh = &config.mesh;
    MeshSpec {
        inner_radius: mesh.inner_radius,
        outer_radius: mesh.outer_radius,
        inner_excision_speed: mesh.inner_excision_speed,
        outer_excision_speed: mesh.outer_excision_speed,
        excision_delay: mesh.excision_delay,
        reference_radius: mesh.reference_radius,
        num_polar_zones: mesh.num_polar_zones,
        block_size: mesh.block_size,
    }
}

pub fn run_control(config: &Configuration) -> RunControl {
    let control = &config.control;
    RunControl {
        final_time: control.final_time,
        fold: control.fold,
        checkpoint_interval: control.checkpoint_interval,
        products_interval: control.products_interval,
    }
}
