use kn_hydro::Primitive;
use serde::{Deserialize, Serialize};

use crate::error::ModelResult;
use crate::halo_kilonova::HaloKilonova;
use crate::jet_in_star::JetInStar;
use crate::model::InitialModel;

/// The physical setup of a run, keyed by name in the configuration:
///
/// ```yaml
/// model:
///   jet_in_star: { star_mass: 2.0e33, ... }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    HaloKilonova(HaloKilonova),
    JetInStar(JetInStar),
}

impl Scenario {
    pub fn name(&self) -> &'static str {
        match self {
            Scenario::HaloKilonova(_) => "halo_kilonova",
            Scenario::JetInStar(_) => "jet_in_star",
        }
    }

    /// Load or generate any tabulated data needed over `[r_min, r_max]`.
    pub fn prepare(&mut self, r_min: f64, r_max: f64) -> ModelResult<()> {
        match self {
            Scenario::HaloKilonova(m) => m.prepare(r_min, r_max),
            Scenario::JetInStar(_) => Ok(()),
        }
    }

    fn model(&self) -> &dyn InitialModel {
        match self {
            Scenario::HaloKilonova(m) => m,
            Scenario::JetInStar(m) => m,
        }
    }
}

impl InitialModel for Scenario {
    fn validate(&self) -> ModelResult<()> {
        self.model().validate()
    }

    fn primitive_at(&self, coordinate: (f64, f64), time: f64) -> Primitive {
        self.model().primitive_at(coordinate, time)
    }

    fn scalar_at(&self, coordinate: (f64, f64), time: f64) -> f64 {
        self.model().scalar_at(coordinate, time)
    }

    fn inner_boundary_condition(&self, coordinate: (f64, f64), time: f64) -> Primitive {
        self.model().inner_boundary_condition(coordinate, time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_to_selected_model() {
        let jet = JetInStar::fiducial();
        let s = Scenario::JetInStar(jet.clone());
        assert_eq!(s.name(), "jet_in_star");
        assert_eq!(
            s.primitive_at((1e9, 0.0), 0.0),
            jet.primitive_at((1e9, 0.0), 0.0)
        );
        let kn = Scenario::HaloKilonova(HaloKilonova::new(1e51, 2e31, 1e9, 2e8, 5e9));
        assert_eq!(kn.name(), "halo_kilonova");
        assert!(kn.validate().is_ok());
    }

    #[test]
    fn serde_uses_scenario_key() {
        let json = r#"{"jet_in_star":{"star_mass":2e33,"engine_duration":1.0,"engine_energy":1e51,"engine_theta":0.1,"engine_u":5.0}}"#;
        let s: Scenario = serde_json::from_str(json).unwrap();
        match s {
            Scenario::JetInStar(m) => assert_eq!(m.eta_0, 1e-3),
            other => panic!("unexpected scenario {}", other.name()),
        }
        let bad = r#"{"jet_in_star":{"star_mass":2e33,"engine_duration":1.0,"engine_energy":1e51,"engine_theta":0.1,"engine_u":5.0,"bogus":1}}"#;
        assert!(serde_json::from_str::<Scenario>(bad).is_err());
        assert!(serde_json::from_str::<Scenario>(r#"{"supernova":{}}"#).is_err());
    }
}
