//! Relativistic jet drilling through a massive star.
//!
//! Progenitor profile after Duffell & MacFadyen (2015): a steep core, a
//! power-law envelope out to `R_ENV`, and a tenuous wind beyond. The engine
//! injects a cold jet through a nozzle of opening angle `engine_theta`.

use std::f64::consts::PI;

use kn_core::constants::{LIGHT_SPEED, SOLAR_MASS};
use kn_hydro::Primitive;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::model::InitialModel;

/// Pressure over ρc² everywhere in the setup.
const UNIFORM_TEMPERATURE: f64 = 1e-3;

const R0: f64 = 7e10;
const R1: f64 = 0.0017 * R0;
const R2: f64 = 0.0125 * R0;
const R3: f64 = 0.65 * R0;
const K1: f64 = 3.24;
const K2: f64 = 2.57;
const N: f64 = 16.7;
const R_NOZZ: f64 = 0.01 * R0;
const R_ENV: f64 = 1.2 * R0;

/// Reference density `M0 / (1.33 π R0³)` for a star of mass `M0`.
fn density_scale(star_mass: f64) -> f64 {
    star_mass / (1.33 * PI * R0 * R0 * R0)
}

fn default_eta_0() -> f64 {
    1e-3
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JetInStar {
    /// Mass of the star (g)
    pub star_mass: f64,
    /// Duration of the engine (s)
    pub engine_duration: f64,
    /// Isotropic-equivalent engine energy (erg)
    pub engine_energy: f64,
    /// Engine half-opening angle (rad)
    pub engine_theta: f64,
    /// Engine four-velocity
    pub engine_u: f64,
    /// Density and pressure of the relic wind relative to the engine flow
    #[serde(default = "default_eta_0")]
    pub eta_0: f64,
}

/// Region of the setup a point falls in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JetZone {
    Core,
    Envelope,
    Wind,
    Jet,
}

impl JetInStar {
    /// A one solar mass progenitor with a mildly relativistic one second engine.
    pub fn fiducial() -> Self {
        Self {
            star_mass: SOLAR_MASS,
            engine_duration: 1.0,
            engine_energy: 1e51,
            engine_theta: 0.1,
            engine_u: 5.0,
            eta_0: default_eta_0(),
        }
    }

    /// Jet three-velocity over c.
    pub fn engine_beta(&self) -> f64 {
        self.engine_u / (1.0 + self.engine_u * self.engine_u).sqrt()
    }

    pub fn in_nozzle(&self, q: f64) -> bool {
        q < self.engine_theta || q > PI - self.engine_theta
    }

    /// Radius reached by the jet head after time `t`.
    pub fn jet_head(&self, t: f64) -> f64 {
        self.engine_beta() * LIGHT_SPEED * t
    }

    pub fn zone(&self, r: f64, q: f64, t: f64) -> JetZone {
        if self.in_nozzle(q) && r < self.jet_head(t) {
            JetZone::Jet
        } else if r < R3 {
            JetZone::Core
        } else if r < R_ENV {
            JetZone::Envelope
        } else {
            JetZone::Wind
        }
    }

    /// Nozzle function `g(r, q)`, normalized so its volume integral is one in
    /// units of the nozzle radius.
    pub fn nozzle_function(&self, r: f64, q: f64) -> f64 {
        let r0 = R_NOZZ / R0;
        let q2 = self.engine_theta * self.engine_theta;
        let n_0 = 4.0 * PI * r0 * r0 * r0 * (1.0 - (-2.0 / q2).exp()) * q2;
        let x = r / R_NOZZ;
        let g = x * (-x * x / 2.0).exp() * ((q.cos().powi(2) - 1.0) / q2).exp();
        g / n_0
    }

    /// Engine mass loading per steradian (g/s/sr).
    pub fn jet_mass_rate_per_steradian(&self, r: f64, q: f64) -> f64 {
        let engine_gamma = (1.0 + self.engine_u * self.engine_u).sqrt();
        let luminosity =
            self.nozzle_function(r, q) * self.engine_energy / (4.0 * PI * self.engine_duration);
        luminosity / (engine_gamma * LIGHT_SPEED * LIGHT_SPEED)
    }

    /// Comoving mass density (g/cm³).
    pub fn mass_density(&self, r: f64, q: f64, t: f64) -> f64 {
        let scale = density_scale(self.star_mass);
        let rho_c = 3e7 * scale;
        let rho_env = 1e-7 * scale;
        let rho_wind = 1e-9 * scale;
        match self.zone(r, q, t) {
            JetZone::Core => {
                let num = rho_c * (1.0 - r / R3).powf(N);
                let denom = 1.0 + (r / R1).powf(K1) / (1.0 + (r / R2).powf(K2));
                num / denom + rho_env * (r / R3).powi(-2)
            }
            JetZone::Envelope => rho_env * (r / R3).powi(-2),
            JetZone::Jet => self.jet_density(r, q),
            JetZone::Wind => rho_wind * (r / R_ENV).powi(-2),
        }
    }

    fn jet_density(&self, r: f64, q: f64) -> f64 {
        self.jet_mass_rate_per_steradian(r, q) / (r * r * self.engine_u * LIGHT_SPEED)
    }

    pub fn gamma_beta(&self, r: f64, q: f64, t: f64) -> f64 {
        match self.zone(r, q, t) {
            JetZone::Jet => self.engine_u,
            _ => 0.0,
        }
    }

    /// The flow launched by the engine at `(r, q)`.
    pub fn engine_state(&self, r: f64, q: f64) -> Primitive {
        let d = self.jet_density(r, q);
        Primitive::new(d, self.engine_u, d * UNIFORM_TEMPERATURE, 1e2)
    }

    pub fn engine_is_on(&self, t: f64) -> bool {
        t < self.engine_duration
    }
}

impl InitialModel for JetInStar {
    fn validate(&self) -> ModelResult<()> {
        let positive = [
            ("jet_in_star.star_mass", self.star_mass),
            ("jet_in_star.engine_duration", self.engine_duration),
            ("jet_in_star.engine_energy", self.engine_energy),
            ("jet_in_star.engine_u", self.engine_u),
            ("jet_in_star.eta_0", self.eta_0),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ModelError::invalid(format!("{name} must be positive, got {value}")));
            }
        }
        if !(self.engine_theta > 0.0 && self.engine_theta <= PI / 2.0) {
            return Err(ModelError::invalid(format!(
                "jet_in_star.engine_theta must lie in (0, pi/2], got {}",
                self.engine_theta
            )));
        }
        Ok(())
    }

    fn primitive_at(&self, coordinate: (f64, f64), t: f64) -> Primitive {
        let (r, q) = coordinate;
        let d = self.mass_density(r, q, t);
        Primitive::new(
            d,
            self.gamma_beta(r, q, t),
            d * UNIFORM_TEMPERATURE,
            self.scalar_at(coordinate, t),
        )
    }

    fn scalar_at(&self, coordinate: (f64, f64), t: f64) -> f64 {
        let (r, q) = coordinate;
        match self.zone(r, q, t) {
            JetZone::Core => 1.0,
            JetZone::Jet => 1e2,
            JetZone::Envelope => 1e-2 * (r / R3).powi(-2),
            JetZone::Wind => 1e-5 * (r / R_ENV).powi(-2),
        }
    }

    /// While the engine runs the inner boundary follows the model itself, so
    /// the jet switches on once its head clears the boundary. Afterwards a
    /// relic wind with the engine four-velocity and density and pressure
    /// reduced by `eta_0` is fed in.
    fn inner_boundary_condition(&self, coordinate: (f64, f64), t: f64) -> Primitive {
        let (r, q) = coordinate;
        if self.engine_is_on(t) {
            self.primitive_at(coordinate, t)
        } else {
            let engine = self.engine_state(r, q);
            Primitive {
                mass_density: engine.mass_density * self.eta_0,
                gas_pressure: engine.gas_pressure * self.eta_0,
                ..engine
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zones_follow_radius_and_time() {
        let m = JetInStar::fiducial();
        assert_eq!(m.zone(1e9, 0.0, 0.0), JetZone::Core);
        assert_eq!(m.zone(5e10, 0.0, 0.0), JetZone::Envelope);
        assert_eq!(m.zone(1e11, 0.0, 0.0), JetZone::Wind);
        assert_eq!(m.zone(1e9, 0.0, 1.0), JetZone::Jet);
        assert_eq!(m.zone(1e9, 1.0, 1.0), JetZone::Core);
    }

    #[test]
    fn profile_is_positive_and_cold() {
        let m = JetInStar::fiducial();
        for k in 0..200 {
            let r = 1e8 * 10f64.powf(k as f64 * 0.02);
            let p = m.primitive_at((r, 0.0), 0.0);
            assert!(p.is_physical(), "r={r} {p:?}");
            assert!((p.gas_pressure / p.mass_density - UNIFORM_TEMPERATURE).abs() < 1e-15);
        }
    }

    #[test]
    fn jet_carries_engine_velocity_and_tag() {
        let m = JetInStar::fiducial();
        let p = m.primitive_at((1e9, 0.0), 1.0);
        assert_eq!(p.gamma_beta, m.engine_u);
        assert_eq!(p.scalar, 1e2);
        assert!(m.engine_beta() < 1.0);
    }

    #[test]
    fn relic_wind_follows_engine_shutoff() {
        let m = JetInStar::fiducial();
        let during = m.inner_boundary_condition((1e9, 0.0), 0.9);
        let after = m.inner_boundary_condition((1e9, 0.0), 1.5);
        let engine = m.engine_state(1e9, 0.0);
        assert_eq!(during, engine);
        assert!((after.mass_density - engine.mass_density * m.eta_0).abs() <= 1e-12 * after.mass_density);
        assert_eq!(after.gamma_beta, m.engine_u);
    }

    #[test]
    fn density_scales_with_star_mass() {
        let light = JetInStar::fiducial();
        let heavy = JetInStar {
            star_mass: 2.0 * light.star_mass,
            ..light.clone()
        };
        let a = light.mass_density(3e10, 0.0, 0.0);
        let b = heavy.mass_density(3e10, 0.0, 0.0);
        assert!((b / a - 2.0).abs() < 1e-12);
    }

    #[test]
    fn validate_rejects_bad_angle() {
        let m = JetInStar {
            engine_theta: 2.0,
            ..JetInStar::fiducial()
        };
        assert!(m.validate().is_err());
        assert!(JetInStar::fiducial().validate().is_ok());
    }
}
