//! Piecewise-linear (PLM) reconstruction of primitive variables.
//!
//! Slopes use the generalized minmod limiter
//!
//! ```text
//! Δ = minmod( θ (c - l), (r - l) / 2, θ (r - c) )
//! ```
//!
//! with `θ = 1` the most diffusive (minmod) and `θ = 2` the least diffusive
//! (monotonized central). Face values `c ± Δ/2` never leave the range
//! spanned by the three-zone stencil.

use crate::error::{HydroError, HydroResult};
use crate::state::Primitive;
use kn_core::minmod3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plm {
    theta: f64,
}

impl Plm {
    pub fn new(plm_theta: f64) -> HydroResult<Self> {
        if !(1.0..=2.0).contains(&plm_theta) {
            return Err(HydroError::InvalidArg {
                what: "plm_theta must lie in [1, 2]",
            });
        }
        Ok(Self { theta: plm_theta })
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    #[inline]
    pub fn slope(&self, l: f64, c: f64, r: f64) -> f64 {
        minmod3(self.theta * (c - l), 0.5 * (r - l), self.theta * (r - c))
    }

    /// Limited slope of every primitive field across a three-zone stencil.
    pub fn gradient(&self, l: &Primitive, c: &Primitive, r: &Primitive) -> Primitive {
        Primitive {
            mass_density: self.slope(l.mass_density, c.mass_density, r.mass_density),
            gamma_beta: self.slope(l.gamma_beta, c.gamma_beta, r.gamma_beta),
            gas_pressure: self.slope(l.gas_pressure, c.gas_pressure, r.gas_pressure),
            scalar: self.slope(l.scalar, c.scalar, r.scalar),
        }
    }

    /// Face states `(at the zone's left face, at its right face)` for the
    /// center zone of the stencil.
    pub fn reconstruct(
        &self,
        l: &Primitive,
        c: &Primitive,
        r: &Primitive,
    ) -> (Primitive, Primitive) {
        let g = self.gradient(l, c, r);
        (extrapolate(c, &g, -0.5), extrapolate(c, &g, 0.5))
    }

    /// The state just left and right of face `face` in a zone array, where
    /// face `i` separates `zones[i - 1]` from `zones[i]`.
    ///
    /// Zones without two neighbors fall back to donor cell.
    pub fn face_states(&self, zones: &[Primitive], face: usize) -> (Primitive, Primitive) {
        debug_assert!(face >= 1 && face < zones.len());
        let left_zone = face - 1;
        let right_zone = face;

        let l = if left_zone >= 1 && left_zone + 1 < zones.len() {
            self.reconstruct(&zones[left_zone - 1], &zones[left_zone], &zones[left_zone + 1])
                .1
        } else {
            zones[left_zone]
        };

        let r = if right_zone >= 1 && right_zone + 1 < zones.len() {
            self.reconstruct(
                &zones[right_zone - 1],
                &zones[right_zone],
                &zones[right_zone + 1],
            )
            .0
        } else {
            zones[right_zone]
        };

        (l, r)
    }
}

fn extrapolate(c: &Primitive, g: &Primitive, fraction: f64) -> Primitive {
    Primitive {
        mass_density: c.mass_density + fraction * g.mass_density,
        gamma_beta: c.gamma_beta + fraction * g.gamma_beta,
        gas_pressure: c.gas_pressure + fraction * g.gas_pressure,
        scalar: c.scalar + fraction * g.scalar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_theta_outside_range() {
        assert!(Plm::new(0.9).is_err());
        assert!(Plm::new(2.1).is_err());
        assert!(Plm::new(1.0).is_ok());
        assert!(Plm::new(2.0).is_ok());
    }

    #[test]
    fn uniform_state_has_zero_slope() {
        let s = Primitive::new(1.3, -0.2, 0.01, 0.4);
        for theta in [1.0, 1.5, 2.0] {
            let plm = Plm::new(theta).unwrap();
            let (fl, fr) = plm.reconstruct(&s, &s, &s);
            assert_eq!(fl, s);
            assert_eq!(fr, s);
        }
    }

    #[test]
    fn extremum_is_flattened() {
        let plm = Plm::new(2.0).unwrap();
        assert_eq!(plm.slope(1.0, 2.0, 1.0), 0.0);
    }

    #[test]
    fn theta_controls_steepness() {
        let mc = Plm::new(2.0).unwrap();
        let mm = Plm::new(1.0).unwrap();
        // l=0, c=1, r=4: central difference 2, one-sided 1 and 3
        assert_eq!(mm.slope(0.0, 1.0, 4.0), 1.0);
        assert_eq!(mc.slope(0.0, 1.0, 4.0), 2.0);
    }

    #[test]
    fn edge_zones_use_donor_cell() {
        let plm = Plm::new(1.5).unwrap();
        let zones = [
            Primitive::new(1.0, 0.0, 1.0, 0.0),
            Primitive::new(2.0, 0.0, 2.0, 0.0),
            Primitive::new(4.0, 0.0, 4.0, 0.0),
        ];
        let (l, _) = plm.face_states(&zones, 1);
        assert_eq!(l, zones[0]);
        let (_, r) = plm.face_states(&zones, 2);
        assert_eq!(r, zones[2]);
    }
}
