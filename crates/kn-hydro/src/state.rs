//! Primitive and conserved state vectors.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Sub};

/// Primitive variables of a zone or face.
///
/// Serialized as a flat `[rho, u, p, s]` array to keep checkpoints compact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Primitive {
    /// Comoving rest-mass density
    pub mass_density: f64,
    /// Radial four-velocity u = Γβ
    pub gamma_beta: f64,
    /// Gas pressure, in units of ρc²
    pub gas_pressure: f64,
    /// Passive scalar concentration
    pub scalar: f64,
}

impl Primitive {
    pub fn new(mass_density: f64, gamma_beta: f64, gas_pressure: f64, scalar: f64) -> Self {
        Self {
            mass_density,
            gamma_beta,
            gas_pressure,
            scalar,
        }
    }

    pub fn lorentz_factor(&self) -> f64 {
        (1.0 + self.gamma_beta * self.gamma_beta).sqrt()
    }

    /// Three-velocity β = u / Γ.
    pub fn velocity(&self) -> f64 {
        self.gamma_beta / self.lorentz_factor()
    }

    /// The same state moving in the opposite direction.
    pub fn mirrored(&self) -> Self {
        Self {
            gamma_beta: -self.gamma_beta,
            ..*self
        }
    }

    pub fn is_physical(&self) -> bool {
        self.mass_density.is_finite()
            && self.gas_pressure.is_finite()
            && self.gamma_beta.is_finite()
            && self.mass_density > 0.0
            && self.gas_pressure > 0.0
    }
}

impl From<[f64; 4]> for Primitive {
    fn from(d: [f64; 4]) -> Self {
        Primitive::new(d[0], d[1], d[2], d[3])
    }
}

impl From<Primitive> for [f64; 4] {
    fn from(p: Primitive) -> Self {
        [p.mass_density, p.gamma_beta, p.gas_pressure, p.scalar]
    }
}

/// Conserved densities (per unit volume), also used as a flux vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Conserved {
    /// Lab-frame density D = ρΓ
    pub lab_density: f64,
    /// Radial momentum density S = ρhΓ²β
    pub momentum: f64,
    /// Energy density less rest mass, τ = ρhΓ² - p - D
    pub energy: f64,
    /// Scalar density D·s
    pub scalar: f64,
}

impl Conserved {
    pub const ZERO: Conserved = Conserved {
        lab_density: 0.0,
        momentum: 0.0,
        energy: 0.0,
        scalar: 0.0,
    };

    pub fn new(lab_density: f64, momentum: f64, energy: f64, scalar: f64) -> Self {
        Self {
            lab_density,
            momentum,
            energy,
            scalar,
        }
    }

    /// Total energy density including rest mass, E = τ + D.
    pub fn total_energy(&self) -> f64 {
        self.energy + self.lab_density
    }

    pub fn is_finite(&self) -> bool {
        self.lab_density.is_finite()
            && self.momentum.is_finite()
            && self.energy.is_finite()
            && self.scalar.is_finite()
    }

    /// Largest absolute component, for tolerance checks.
    pub fn max_abs(&self) -> f64 {
        self.lab_density
            .abs()
            .max(self.momentum.abs())
            .max(self.energy.abs())
            .max(self.scalar.abs())
    }
}

impl From<[f64; 4]> for Conserved {
    fn from(d: [f64; 4]) -> Self {
        Conserved::new(d[0], d[1], d[2], d[3])
    }
}

impl From<Conserved> for [f64; 4] {
    fn from(u: Conserved) -> Self {
        [u.lab_density, u.momentum, u.energy, u.scalar]
    }
}

impl Add for Conserved {
    type Output = Conserved;

    fn add(self, b: Conserved) -> Conserved {
        Conserved::new(
            self.lab_density + b.lab_density,
            self.momentum + b.momentum,
            self.energy + b.energy,
            self.scalar + b.scalar,
        )
    }
}

impl AddAssign for Conserved {
    fn add_assign(&mut self, b: Conserved) {
        *self = *self + b;
    }
}

impl Sub for Conserved {
    type Output = Conserved;

    fn sub(self, b: Conserved) -> Conserved {
        Conserved::new(
            self.lab_density - b.lab_density,
            self.momentum - b.momentum,
            self.energy - b.energy,
            self.scalar - b.scalar,
        )
    }
}

impl Mul<f64> for Conserved {
    type Output = Conserved;

    fn mul(self, a: f64) -> Conserved {
        Conserved::new(
            self.lab_density * a,
            self.momentum * a,
            self.energy * a,
            self.scalar * a,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_kinematics() {
        let p = Primitive::new(1.0, 0.75, 0.1, 0.0);
        assert!((p.lorentz_factor() - 1.25).abs() < 1e-14);
        assert!((p.velocity() - 0.6).abs() < 1e-14);
        assert_eq!(p.mirrored().gamma_beta, -0.75);
        assert!(p.is_physical());
        assert!(!Primitive::new(1.0, 0.0, -1.0, 0.0).is_physical());
    }

    #[test]
    fn conserved_arithmetic() {
        let a = Conserved::new(1.0, 2.0, 3.0, 4.0);
        let b = Conserved::new(0.5, 0.5, 0.5, 0.5);
        assert_eq!(a + b, Conserved::new(1.5, 2.5, 3.5, 4.5));
        assert_eq!(a - b, Conserved::new(0.5, 1.5, 2.5, 3.5));
        assert_eq!(a * 2.0, Conserved::new(2.0, 4.0, 6.0, 8.0));
        assert_eq!(a.total_energy(), 4.0);
        assert_eq!(a.max_abs(), 4.0);
    }
}
