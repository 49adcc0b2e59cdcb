use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use kn_hydro::RiemannSolverKind;
use kn_project::{ProjectError, from_yaml_str, load, save_json, save_yaml, validate_config};

fn jet_text() -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../presets/jet_in_star.yaml");
    std::fs::read_to_string(path).expect("read preset")
}

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    dir
}

#[test]
fn unknown_keys_fail_fast() {
    let text = jet_text().replace("fold: 50", "fold: 50\n  folds: 3");
    assert!(from_yaml_str(&text).is_err());

    let text = jet_text().replace("engine_u: 5.0", "engine_u: 5.0\n    engine_v: 1.0");
    assert!(from_yaml_str(&text).is_err());
}

#[test]
fn closed_enumerations() {
    let text = jet_text().replace("runge_kutta_order: RK2", "runge_kutta_order: RK4");
    assert!(from_yaml_str(&text).is_err());

    let text = jet_text().replace("riemann_solver: HLLC", "riemann_solver: Roe");
    assert!(from_yaml_str(&text).is_err());

    let text = jet_text().replace("jet_in_star:", "jet_in_galaxy:");
    assert!(from_yaml_str(&text).is_err());
}

#[test]
fn hll_is_an_alias_for_hlle() {
    let text = jet_text().replace("riemann_solver: HLLC", "riemann_solver: HLL");
    let config = from_yaml_str(&text).expect("HLL accepted");
    assert_eq!(config.relativistic().riemann_solver, RiemannSolverKind::HLLE);
}

#[test]
fn out_of_range_values_are_rejected() {
    for (from, to) in [
        ("plm_theta: 1.5", "plm_theta: 2.5"),
        ("gamma_law_index: 1.3333333333333333", "gamma_law_index: 1.0"),
        ("cfl_number: 0.3", "cfl_number: 0.0"),
        ("outer_radius: 1.0e11", "outer_radius: 1.0e8"),
        ("block_size: 16", "block_size: 0"),
        ("fold: 50", "fold: 0"),
        ("num_threads: null", "num_threads: 0"),
        ("engine_theta: 0.1", "engine_theta: -0.1"),
        ("final_time: 3.0", "final_time: -1.0"),
        ("inner_excision_speed: 1.0e9", "inner_excision_speed: -5.0e10"),
    ] {
        let text = jet_text().replace(from, to);
        let config = from_yaml_str(&text).expect("parses");
        assert!(validate_config(&config).is_err(), "accepted {to}");
    }
}

#[test]
fn save_and_reload_in_both_formats() {
    let dir = unique_temp_dir("kn_project_roundtrip");
    std::fs::create_dir_all(&dir).expect("temp dir");
    let config = from_yaml_str(&jet_text()).expect("parse");

    let yaml = dir.join("config.yaml");
    save_yaml(&yaml, &config).expect("save yaml");
    assert_eq!(load(&yaml).expect("load yaml"), config);
    let written = std::fs::read_to_string(&yaml).expect("read back");
    assert!(written.contains("relativistic:"));

    let json = dir.join("config.json");
    save_json(&json, &config).expect("save json");
    assert_eq!(load(&json).expect("load json"), config);

    let toml = dir.join("config.toml");
    assert!(matches!(load(&toml), Err(ProjectError::UnsupportedFormat { .. })));

    let _ = std::fs::remove_dir_all(&dir);
}
