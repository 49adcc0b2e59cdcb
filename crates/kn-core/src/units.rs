// kn-core/src/units.rs
//
// The hydro kernels work with raw f64 in cgs; quantities cross into uom only
// where physical parameters are converted into dimensionless ratios.

use uom::si::f64::{
    Energy as UomEnergy, Mass as UomMass, Ratio as UomRatio, Velocity as UomVelocity,
};

pub type Energy = UomEnergy;
pub type Mass = UomMass;
pub type Ratio = UomRatio;
pub type Velocity = UomVelocity;

#[inline]
pub fn grams(v: f64) -> Mass {
    use uom::si::mass::gram;
    Mass::new::<gram>(v)
}

#[inline]
pub fn erg(v: f64) -> Energy {
    use uom::si::energy::erg;
    Energy::new::<erg>(v)
}

#[inline]
pub fn cm_per_s(v: f64) -> Velocity {
    use uom::si::velocity::centimeter_per_second;
    Velocity::new::<centimeter_per_second>(v)
}

#[inline]
pub fn to_ratio(r: Ratio) -> f64 {
    use uom::si::ratio::ratio;
    r.get::<ratio>()
}

pub mod constants {
    use super::*;

    /// Speed of light in cm/s (the rounded value the models are calibrated with).
    pub const LIGHT_SPEED: f64 = 3e10;

    /// Mass of the sun in grams.
    pub const SOLAR_MASS: f64 = 2e33;

    #[inline]
    pub fn light_speed() -> Velocity {
        cm_per_s(LIGHT_SPEED)
    }

    /// Rest-mass energy m c^2.
    #[inline]
    pub fn rest_mass_energy(m: Mass) -> Energy {
        m * light_speed() * light_speed()
    }

    /// Lorentz factor of a cold shell of mass `m` carrying kinetic energy `e`,
    /// from E = (Γ - 1) m c^2.
    #[inline]
    pub fn lorentz_factor_from_kinetic(e: Energy, m: Mass) -> f64 {
        1.0 + to_ratio(e / rest_mass_energy(m))
    }
}
