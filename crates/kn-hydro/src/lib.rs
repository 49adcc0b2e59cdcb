//! kn-hydro: special-relativistic gas dynamics kernels.
//!
//! Provides:
//! - Primitive and conserved state vectors for radial flow with a passive scalar
//! - Gamma-law equation of state with primitive recovery (`GammaLaw`)
//! - Piecewise-linear slope-limited reconstruction (`Plm`)
//! - HLLE and HLLC approximate Riemann solvers
//!
//! # Units
//!
//! Everything here works with `c = 1`: velocities are fractions of the speed
//! of light, pressures are measured in units of `ρ c²`. Callers convert
//! fluxes and wave speeds to cgs by multiplying with the light speed.
//!
//! # Example
//!
//! ```
//! use kn_hydro::{GammaLaw, Primitive, RiemannSolverKind};
//!
//! let eos = GammaLaw::new(4.0 / 3.0).unwrap();
//! let l = Primitive::new(1.0, 0.0, 1.0, 0.0);
//! let r = Primitive::new(0.1, 0.0, 0.01, 0.0);
//! let f = RiemannSolverKind::HLLC.solve(&eos, &l, &r);
//! assert!(f.flux.lab_density > 0.0);
//! ```

pub mod eos;
pub mod error;
pub mod reconstruct;
pub mod riemann;
pub mod state;

pub use eos::GammaLaw;
pub use error::{HydroError, HydroResult};
pub use reconstruct::Plm;
pub use riemann::{Hllc, Hlle, RiemannFlux, RiemannSolver, RiemannSolverKind};
pub use state::{Conserved, Primitive};
