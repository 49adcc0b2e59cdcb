use kn_hydro::Primitive;

use crate::error::ModelResult;

/// Capability shared by every physical setup.
///
/// Coordinates are `(radius, polar_angle)` with the radius in cm; times are in
/// seconds. Returned primitives carry the passive scalar.
pub trait InitialModel {
    fn validate(&self) -> ModelResult<()>;

    fn primitive_at(&self, coordinate: (f64, f64), time: f64) -> Primitive;

    fn scalar_at(&self, coordinate: (f64, f64), time: f64) -> f64;

    /// State of the fluid entering through the inner boundary located at
    /// `coordinate`.
    fn inner_boundary_condition(&self, coordinate: (f64, f64), time: f64) -> Primitive;

    /// Initial state of every zone centred at `radii` along one ray.
    fn initialize(&self, radii: &[f64], polar_angle: f64, time: f64) -> Vec<Primitive> {
        radii
            .iter()
            .map(|&r| self.primitive_at((r, polar_angle), time))
            .collect()
    }
}
