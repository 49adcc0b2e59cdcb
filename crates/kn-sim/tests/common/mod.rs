#![allow(dead_code)]

use kn_hydro::RiemannSolverKind;
use kn_mesh::MeshSpec;
use kn_models::{HaloKilonova, JetInStar, Scenario};
use kn_sim::{
    Driver, HydroScheme, IntegratorType, Products, Setup, Snapshot, State, TaskHandler, Tasks,
};

pub fn scheme(integrator: IntegratorType, cfl_number: f64) -> HydroScheme {
    HydroScheme::new(4.0 / 3.0, 1.5, cfl_number, RiemannSolverKind::HLLC, integrator)
        .expect("valid scheme")
}

pub fn jet_mesh() -> MeshSpec {
    MeshSpec {
        inner_radius: 1e9,
        outer_radius: 1e10,
        inner_excision_speed: 0.0,
        outer_excision_speed: 0.0,
        excision_delay: None,
        reference_radius: 1e9,
        num_polar_zones: 64,
        block_size: 8,
    }
}

pub fn kilonova_mesh() -> MeshSpec {
    MeshSpec {
        inner_radius: 1e8,
        outer_radius: 1e10,
        inner_excision_speed: 0.0,
        outer_excision_speed: 0.0,
        excision_delay: None,
        reference_radius: 1e8,
        num_polar_zones: 48,
        block_size: 8,
    }
}

pub fn setup(scheme: HydroScheme, mesh: MeshSpec) -> Setup {
    Setup {
        scheme,
        mesh,
        polar_angle: 0.0,
        start_time: 0.0,
        num_threads: Some(2),
    }
}

pub fn jet() -> Scenario {
    Scenario::JetInStar(JetInStar::fiducial())
}

pub fn kilonova() -> Scenario {
    Scenario::HaloKilonova(HaloKilonova::new(1e51, 2e31, 1e9, 2e8, 5e9))
}

pub fn jet_driver(integrator: IntegratorType) -> Driver {
    Driver::new(setup(scheme(integrator, 0.3), jet_mesh()), jet()).expect("jet driver")
}

/// Keeps every checkpoint and product in memory.
#[derive(Default)]
pub struct Recorder {
    pub checkpoints: Vec<(usize, State, Tasks)>,
    pub products: Vec<(usize, Products)>,
    pub progress_events: usize,
}

impl TaskHandler for Recorder {
    type Error = String;

    fn write_checkpoint(&mut self, snapshot: Snapshot<'_>) -> Result<(), Self::Error> {
        self.checkpoints
            .push((snapshot.number, snapshot.state.clone(), *snapshot.tasks));
        Ok(())
    }

    fn write_products(&mut self, number: usize, products: &Products) -> Result<(), Self::Error> {
        self.products.push((number, products.clone()));
        Ok(())
    }

    fn progress(&mut self, _progress: &kn_sim::Progress) {
        self.progress_events += 1;
    }
}

/// Fails every checkpoint write.
#[derive(Default)]
pub struct Failing {
    pub attempts: Vec<usize>,
}

impl TaskHandler for Failing {
    type Error = String;

    fn write_checkpoint(&mut self, snapshot: Snapshot<'_>) -> Result<(), Self::Error> {
        self.attempts.push(snapshot.number);
        Err("disk full".to_string())
    }

    fn write_products(&mut self, _number: usize, _products: &Products) -> Result<(), Self::Error> {
        Ok(())
    }
}
