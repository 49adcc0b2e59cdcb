//! Excising boundary state machine.
//!
//! A boundary with zero speed is `Fixed`. A boundary with nonzero speed and a
//! positive excision delay starts `Delayed` and switches to `Moving` once the
//! step start time reaches `start_time + excision_delay`. A `Moving` boundary
//! advances by `speed * dt` every step.

use serde::{Deserialize, Serialize};

use crate::error::{MeshError, MeshResult};
use crate::geometry::MeshSpec;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryMotion {
    Fixed,
    Delayed { activation_time: f64 },
    Moving,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    pub radius: f64,
    pub speed: f64,
    pub motion: BoundaryMotion,
}

impl Boundary {
    pub fn new(radius: f64, speed: f64, start_time: f64, excision_delay: Option<f64>) -> Self {
        let motion = if speed == 0.0 {
            BoundaryMotion::Fixed
        } else {
            match excision_delay {
                Some(delay) if delay > 0.0 => BoundaryMotion::Delayed {
                    activation_time: start_time + delay,
                },
                _ => BoundaryMotion::Moving,
            }
        };
        Self {
            radius,
            speed,
            motion,
        }
    }

    /// Advance over the step `[time, time + dt]`.
    pub fn advance(&mut self, time: f64, dt: f64) {
        if let BoundaryMotion::Delayed { activation_time } = self.motion {
            if time >= activation_time {
                self.motion = BoundaryMotion::Moving;
            }
        }
        if self.motion == BoundaryMotion::Moving {
            self.radius += self.speed * dt;
        }
    }

    pub fn is_moving(&self) -> bool {
        self.motion == BoundaryMotion::Moving
    }
}

/// The pair of domain boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshBoundaries {
    pub inner: Boundary,
    pub outer: Boundary,
}

impl MeshBoundaries {
    pub fn new(spec: &MeshSpec, start_time: f64) -> Self {
        Self {
            inner: Boundary::new(
                spec.inner_radius,
                spec.inner_excision_speed,
                start_time,
                spec.excision_delay,
            ),
            outer: Boundary::new(
                spec.outer_radius,
                spec.outer_excision_speed,
                start_time,
                spec.excision_delay,
            ),
        }
    }

    /// Move both boundaries and enforce `inner < outer`.
    pub fn advance(&mut self, time: f64, dt: f64) -> MeshResult<()> {
        self.inner.advance(time, dt);
        self.outer.advance(time, dt);
        self.check()
    }

    pub fn check(&self) -> MeshResult<()> {
        if self.inner.radius < self.outer.radius {
            Ok(())
        } else {
            Err(MeshError::BoundaryCollision {
                inner: self.inner.radius,
                outer: self.outer.radius,
            })
        }
    }
}
