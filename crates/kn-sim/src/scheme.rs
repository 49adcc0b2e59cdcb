//! Numerical scheme selection for a run.

use kn_hydro::{GammaLaw, Plm, RiemannSolverKind};
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Explicit Runge-Kutta scheme in Shu-Osher form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegratorType {
    /// Forward Euler (1st order, one flux evaluation per step).
    RK1,
    /// Two-stage TVD Runge-Kutta (Heun).
    #[default]
    RK2,
}

impl IntegratorType {
    /// Weight of the start-of-step state in each stage: stage `s` sets
    /// `U ← w_s U^n + (1 - w_s)(U + dt L(U))`.
    pub fn stage_weights(&self) -> &'static [f64] {
        match self {
            IntegratorType::RK1 => &[0.0],
            IntegratorType::RK2 => &[0.0, 0.5],
        }
    }

    /// Factor by which a change made during stage `s` survives into the end
    /// of the step.
    pub fn stage_carry(&self, s: usize) -> f64 {
        self.stage_weights()[s + 1..]
            .iter()
            .map(|w| 1.0 - w)
            .product()
    }

    /// Times within the step at which each stage evaluates boundary data, as
    /// fractions of `dt`.
    pub fn stage_times(&self) -> &'static [f64] {
        match self {
            IntegratorType::RK1 => &[0.0],
            IntegratorType::RK2 => &[0.0, 1.0],
        }
    }
}

/// Density and pressure floors, and how long a zone may live on them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Floors {
    pub density_floor: f64,
    pub pressure_floor: f64,
    pub max_consecutive_floors: u32,
}

impl Default for Floors {
    fn default() -> Self {
        Self {
            density_floor: 1e-20,
            pressure_floor: 1e-24,
            max_consecutive_floors: 100,
        }
    }
}

impl Floors {
    /// Clamp a state onto the floors. Returns the state and whether it moved.
    pub fn apply(&self, p: kn_hydro::Primitive) -> (kn_hydro::Primitive, bool) {
        let mut out = p;
        out.mass_density = p.mass_density.max(self.density_floor);
        out.gas_pressure = p.gas_pressure.max(self.pressure_floor);
        if !out.gamma_beta.is_finite() {
            out.gamma_beta = 0.0;
        }
        if !out.scalar.is_finite() {
            out.scalar = 0.0;
        }
        (out, out != p)
    }
}

/// Everything that determines how a single step is taken.
#[derive(Clone, Debug)]
pub struct HydroScheme {
    pub eos: GammaLaw,
    pub plm: Plm,
    pub riemann_solver: RiemannSolverKind,
    pub integrator: IntegratorType,
    pub cfl_number: f64,
    pub adaptive_time_step: bool,
    pub floors: Floors,
}

impl HydroScheme {
    pub fn new(
        gamma_law_index: f64,
        plm_theta: f64,
        cfl_number: f64,
        riemann_solver: RiemannSolverKind,
        integrator: IntegratorType,
    ) -> SimResult<Self> {
        if !(cfl_number > 0.0 && cfl_number.is_finite()) {
            return Err(SimError::InvalidArg {
                what: "cfl_number must be positive",
            });
        }
        Ok(Self {
            eos: GammaLaw::new(gamma_law_index)?,
            plm: Plm::new(plm_theta)?,
            riemann_solver,
            integrator,
            cfl_number,
            adaptive_time_step: false,
            floors: Floors::default(),
        })
    }

    pub fn with_adaptive_time_step(mut self, adaptive: bool) -> Self {
        self.adaptive_time_step = adaptive;
        self
    }

    pub fn with_floors(mut self, floors: Floors) -> Self {
        self.floors = floors;
        self
    }
}
