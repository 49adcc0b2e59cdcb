//! Gamma-law equation of state for an ideal relativistic fluid.
//!
//! Closure `p = (Γ - 1) ρ ε`, specific enthalpy `h = 1 + ε + p/ρ`.

use crate::error::{HydroError, HydroResult};
use crate::state::{Conserved, Primitive};

/// Maximum Newton iterations in primitive recovery.
const MAX_ITERATIONS: usize = 64;

/// Relative convergence threshold on the pressure.
const PRESSURE_TOLERANCE: f64 = 1e-13;

/// Convergence floor relative to the total energy; cold states cannot resolve
/// the pressure more finely than roundoff in E allows.
const ENERGY_TOLERANCE: f64 = 1e-14;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GammaLaw {
    gamma: f64,
}

impl GammaLaw {
    pub fn new(gamma_law_index: f64) -> HydroResult<Self> {
        if !gamma_law_index.is_finite() || gamma_law_index <= 1.0 {
            return Err(HydroError::InvalidArg {
                what: "gamma_law_index must be finite and greater than 1",
            });
        }
        Ok(Self {
            gamma: gamma_law_index,
        })
    }

    pub fn gamma_law_index(&self) -> f64 {
        self.gamma
    }

    pub fn specific_enthalpy(&self, mass_density: f64, gas_pressure: f64) -> f64 {
        1.0 + self.gamma / (self.gamma - 1.0) * gas_pressure / mass_density
    }

    pub fn sound_speed_squared(&self, mass_density: f64, gas_pressure: f64) -> f64 {
        let h = self.specific_enthalpy(mass_density, gas_pressure);
        self.gamma * gas_pressure / (mass_density * h)
    }

    pub fn conserved_from_primitive(&self, p: &Primitive) -> Conserved {
        let w = p.lorentz_factor();
        let rho = p.mass_density;
        let pre = p.gas_pressure;
        let h = self.specific_enthalpy(rho, pre);
        let d = rho * w;
        Conserved {
            lab_density: d,
            momentum: rho * h * w * p.gamma_beta,
            energy: rho * h * w * w - pre - d,
            scalar: d * p.scalar,
        }
    }

    /// Recover the gas pressure of a conserved state, starting the Newton
    /// iteration from `pressure_guess`.
    pub fn pressure_from_conserved(&self, u: &Conserved, pressure_guess: f64) -> HydroResult<f64> {
        let d = u.lab_density;
        let s = u.momentum;
        let e = u.total_energy();

        if !u.is_finite() {
            return Err(HydroError::NonPhysical {
                what: "non-finite conserved state",
                value: f64::NAN,
            });
        }
        if d <= 0.0 {
            return Err(HydroError::NonPhysical {
                what: "lab-frame density",
                value: d,
            });
        }
        if e <= s.abs() {
            return Err(HydroError::NonPhysical {
                what: "total energy below momentum",
                value: e - s.abs(),
            });
        }

        // The residual decreases monotonically in p, so a non-positive value
        // at p = 0 means the root is at negative pressure.
        if self.residual(d, s, e, 0.0).0 <= 0.0 {
            return Err(HydroError::NonPhysical {
                what: "gas pressure",
                value: 0.0,
            });
        }

        let mut p = if pressure_guess.is_finite() && pressure_guess > 0.0 {
            pressure_guess
        } else {
            (self.gamma - 1.0) * u.energy.max(f64::MIN_POSITIVE)
        };

        for _ in 0..MAX_ITERATIONS {
            let (f, df) = self.residual(d, s, e, p);
            let mut p_next = p - f / df;
            if !p_next.is_finite() {
                break;
            }
            if p_next <= 0.0 {
                p_next = 0.5 * p;
            }
            let tolerance = (PRESSURE_TOLERANCE * p_next).max(ENERGY_TOLERANCE * e);
            if (p_next - p).abs() <= tolerance {
                return Ok(p_next);
            }
            p = p_next;
        }

        Err(HydroError::RootFinderFailed {
            iterations: MAX_ITERATIONS,
            lab_density: d,
            momentum: s,
            energy: u.energy,
        })
    }

    /// Invert the conserved state. The scalar concentration is carried as
    /// `D s / D`.
    pub fn primitive_from_conserved(
        &self,
        u: &Conserved,
        pressure_guess: f64,
    ) -> HydroResult<Primitive> {
        let p = self.pressure_from_conserved(u, pressure_guess)?;
        let v = u.momentum / (u.total_energy() + p);
        let w = 1.0 / (1.0 - v * v).sqrt();
        let rho = u.lab_density / w;

        if !(rho > 0.0) {
            return Err(HydroError::NonPhysical {
                what: "mass density",
                value: rho,
            });
        }

        Ok(Primitive {
            mass_density: rho,
            gamma_beta: w * v,
            gas_pressure: p,
            scalar: u.scalar / u.lab_density,
        })
    }

    /// Radial physical flux of a state (c = 1).
    pub fn flux(&self, p: &Primitive, u: &Conserved) -> Conserved {
        let v = p.velocity();
        Conserved {
            lab_density: u.lab_density * v,
            momentum: u.momentum * v + p.gas_pressure,
            energy: u.momentum - u.lab_density * v,
            scalar: u.scalar * v,
        }
    }

    /// Outer characteristic speeds `(λ-, λ+)` of a state: the sound speed
    /// added relativistically to the flow velocity, `(v ± cs) / (1 ± v cs)`.
    pub fn wave_speeds(&self, p: &Primitive) -> (f64, f64) {
        let v = p.velocity();
        let cs = self
            .sound_speed_squared(p.mass_density, p.gas_pressure)
            .sqrt();
        ((v - cs) / (1.0 - v * cs), (v + cs) / (1.0 + v * cs))
    }

    pub fn max_wave_speed(&self, p: &Primitive) -> f64 {
        let (lm, lp) = self.wave_speeds(p);
        lm.abs().max(lp.abs())
    }

    /// Residual f(p) = (Γ-1) ρ ε - p and its derivative in p.
    ///
    /// With Q = E + p: v = S/Q, ρh = Q(1 - v²), ρ = D sqrt(1 - v²), giving
    /// f' = (Γ-1) v² (1 - ρW²/Q) - 1, which is negative for Γ <= 2.
    fn residual(&self, d: f64, s: f64, e: f64, p: f64) -> (f64, f64) {
        let q = e + p;
        let v = s / q;
        let v2 = v * v;
        let one_minus_v2 = 1.0 - v2;
        let rho = d * one_minus_v2.sqrt();
        let rho_h = q * one_minus_v2;
        let rho_eps = rho_h - p - rho;
        let f = (self.gamma - 1.0) * rho_eps - p;
        let df = (self.gamma - 1.0) * v2 * (1.0 - rho / (q * one_minus_v2)) - 1.0;
        (f, df)
    }
}
