mod common;

use std::path::Path;

use common::{preset_in, unique_temp_dir};
use kn_app::compile;
use kn_sim::Driver;

/// Step a preset to its final time, checking after every step that the
/// boundaries stay ordered and the mesh still covers the domain.
fn run_preset_checking_boundaries(name: &str, dir: &Path) -> Driver {
    let config = preset_in(name, dir);
    let run = compile(&config).expect("compiles");
    let final_time = run.control.final_time;
    let mut driver = Driver::new(run.setup, run.scenario).expect("driver");

    let mut steps = 0u64;
    while driver.state().clock.time < final_time {
        if let Err(e) = driver.advance(final_time) {
            panic!("{name} failed at t = {}: {e}", driver.state().clock.time);
        }
        steps += 1;

        let state = driver.state();
        let inner = state.boundaries.inner.radius;
        let outer = state.boundaries.outer.radius;
        assert!(inner < outer, "{name}: inner {inner} >= outer {outer}");
        let first = state.mesh_inner_face().expect("blocks");
        let last = state.mesh_outer_face().expect("blocks");
        assert!(first <= inner || state.blocks.len() == 1);
        assert!(last >= outer);
        assert!(state.total_mass().is_finite());
    }

    assert_eq!(driver.state().clock.time, final_time);
    assert_eq!(driver.state().clock.iteration, steps);
    driver
}

#[test]
fn halo_kilonova_preset_keeps_boundaries_ordered() {
    let dir = unique_temp_dir("kn_app_kilonova_preset");
    let driver = run_preset_checking_boundaries("halo_kilonova.yaml", &dir);

    let state = driver.state();
    assert_eq!(state.boundaries.inner.radius, 1e8);
    assert_eq!(state.boundaries.outer.radius, 1e10);
    assert_eq!(state.ledger.excised, 0.0);
    assert!(state.ledger.relative_error(state.total_mass()) < 1e-8);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn jet_in_star_preset_excises_and_grows() {
    let dir = unique_temp_dir("kn_app_jet_preset");
    let config = preset_in("jet_in_star.yaml", &dir);
    let initial = Driver::new(compile(&config).expect("compiles").setup, config.model.clone())
        .expect("driver");
    let first_index = initial.state().blocks[0].geometry.index.get();
    let last_index = initial
        .state()
        .blocks
        .last()
        .expect("blocks")
        .geometry
        .index
        .get();

    let driver = run_preset_checking_boundaries("jet_in_star.yaml", &dir);
    let state = driver.state();
    // Both boundaries start moving at t = 1 s.
    assert!((state.boundaries.inner.radius - 3e9).abs() < 1e-3 * 3e9);
    assert!((state.boundaries.outer.radius - 1.3e11).abs() < 1e-3 * 1.3e11);
    assert!(state.blocks[0].geometry.index.get() > first_index);
    assert!(state.blocks.last().expect("blocks").geometry.index.get() > last_index);
    assert!(state.ledger.excised > 0.0);
    assert!(state.ledger.injected > 0.0);
    let _ = std::fs::remove_dir_all(&dir);
}
