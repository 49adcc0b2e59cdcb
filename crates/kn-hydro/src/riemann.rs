//! Approximate Riemann solvers for radial relativistic flow.
//!
//! Both solvers use Davis-type outer wave speed estimates
//! `S_L = min(λ-(L), λ-(R))`, `S_R = max(λ+(L), λ+(R))`. HLLC resolves the
//! contact wave following Mignone & Bodo (2005) and falls back to HLL when the
//! contact state cannot be formed.

use serde::{Deserialize, Serialize};

use crate::eos::GammaLaw;
use crate::state::{Conserved, Primitive};

/// Numerical flux across a face, with the largest signal speed seen there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiemannFlux {
    pub flux: Conserved,
    pub max_wave_speed: f64,
}

pub trait RiemannSolver {
    fn solve(&self, eos: &GammaLaw, l: &Primitive, r: &Primitive) -> RiemannFlux;

    fn name(&self) -> &'static str;
}

/// Solver selection, as named in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RiemannSolverKind {
    #[serde(alias = "HLL")]
    HLLE,
    #[default]
    HLLC,
}

impl RiemannSolverKind {
    pub fn solve(&self, eos: &GammaLaw, l: &Primitive, r: &Primitive) -> RiemannFlux {
        match self {
            RiemannSolverKind::HLLE => Hlle.solve(eos, l, r),
            RiemannSolverKind::HLLC => Hllc.solve(eos, l, r),
        }
    }
}

/// Two-wave HLL solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hlle;

/// Three-wave HLLC solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hllc;

/// Everything both solvers need about one side of the face.
struct Side {
    prim: Primitive,
    cons: Conserved,
    flux: Conserved,
}

impl Side {
    fn new(eos: &GammaLaw, prim: &Primitive) -> Self {
        let cons = eos.conserved_from_primitive(prim);
        let flux = eos.flux(prim, &cons);
        Self {
            prim: *prim,
            cons,
            flux,
        }
    }
}

fn outer_speeds(eos: &GammaLaw, l: &Primitive, r: &Primitive) -> (f64, f64) {
    let (lm_l, lp_l) = eos.wave_speeds(l);
    let (lm_r, lp_r) = eos.wave_speeds(r);
    (lm_l.min(lm_r), lp_l.max(lp_r))
}

fn hll_state(sl: &Side, sr: &Side, a_l: f64, a_r: f64) -> Conserved {
    (sr.cons * a_r - sl.cons * a_l + sl.flux - sr.flux) * (1.0 / (a_r - a_l))
}

fn hll_flux(sl: &Side, sr: &Side, a_l: f64, a_r: f64) -> Conserved {
    (sl.flux * a_r - sr.flux * a_l + (sr.cons - sl.cons) * (a_l * a_r)) * (1.0 / (a_r - a_l))
}

impl RiemannSolver for Hlle {
    fn solve(&self, eos: &GammaLaw, l: &Primitive, r: &Primitive) -> RiemannFlux {
        let sl = Side::new(eos, l);
        let sr = Side::new(eos, r);
        let (a_l, a_r) = outer_speeds(eos, l, r);
        let max_wave_speed = a_l.abs().max(a_r.abs());

        let flux = if a_l >= 0.0 {
            sl.flux
        } else if a_r <= 0.0 {
            sr.flux
        } else {
            hll_flux(&sl, &sr, a_l, a_r)
        };
        RiemannFlux {
            flux,
            max_wave_speed,
        }
    }

    fn name(&self) -> &'static str {
        "HLLE"
    }
}

impl Hllc {
    /// Contact speed and pressure from the HLL state, or `None` when the
    /// quadratic has no usable root.
    fn contact(sl: &Side, sr: &Side, a_l: f64, a_r: f64) -> Option<(f64, f64)> {
        let u_hll = hll_state(sl, sr, a_l, a_r);
        let f_hll = hll_flux(sl, sr, a_l, a_r);

        let e_hll = u_hll.total_energy();
        let fe_hll = f_hll.total_energy();
        let m_hll = u_hll.momentum;
        let fm_hll = f_hll.momentum;

        // fe λ² - (e + fm) λ + m = 0, smaller root written so that fe -> 0
        // is harmless.
        let b = e_hll + fm_hll;
        let disc = b * b - 4.0 * fe_hll * m_hll;
        if !(disc >= 0.0) || !(b > 0.0) {
            return None;
        }
        let lambda_star = 2.0 * m_hll / (b + disc.sqrt());
        let p_star = fm_hll - fe_hll * lambda_star;

        if !lambda_star.is_finite() || !p_star.is_finite() || p_star <= 0.0 {
            return None;
        }
        if lambda_star <= a_l || lambda_star >= a_r {
            return None;
        }
        Some((lambda_star, p_star))
    }

    fn star_flux(side: &Side, a: f64, lambda_star: f64, p_star: f64) -> Conserved {
        let v = side.prim.velocity();
        let p = side.prim.gas_pressure;
        let u = side.cons;
        let e = u.total_energy();
        let denom = 1.0 / (a - lambda_star);

        let d_star = u.lab_density * (a - v) * denom;
        let m_star = (u.momentum * (a - v) + p_star - p) * denom;
        let e_star = (e * (a - v) + p_star * lambda_star - p * v) * denom;
        let ds_star = u.scalar * (a - v) * denom;

        let u_star = Conserved::new(d_star, m_star, e_star - d_star, ds_star);
        side.flux + (u_star - u) * a
    }
}

impl RiemannSolver for Hllc {
    fn solve(&self, eos: &GammaLaw, l: &Primitive, r: &Primitive) -> RiemannFlux {
        let sl = Side::new(eos, l);
        let sr = Side::new(eos, r);
        let (a_l, a_r) = outer_speeds(eos, l, r);
        let max_wave_speed = a_l.abs().max(a_r.abs());

        let flux = if a_l >= 0.0 {
            sl.flux
        } else if a_r <= 0.0 {
            sr.flux
        } else {
            match Self::contact(&sl, &sr, a_l, a_r) {
                Some((lambda_star, p_star)) if lambda_star >= 0.0 => {
                    Self::star_flux(&sl, a_l, lambda_star, p_star)
                }
                Some((lambda_star, p_star)) => Self::star_flux(&sr, a_r, lambda_star, p_star),
                None => hll_flux(&sl, &sr, a_l, a_r),
            }
        };
        RiemannFlux {
            flux,
            max_wave_speed,
        }
    }

    fn name(&self) -> &'static str {
        "HLLC"
    }
}
