//! kn-mesh: block-structured radial mesh with excising boundaries.
//!
//! Zones are logarithmically spaced with `Δln r = π / num_polar_zones` and
//! grouped into blocks of `block_size` zones on a fixed lattice anchored at
//! the reference radius. The physical domain `[inner_radius(t),
//! outer_radius(t)]` moves across that lattice; whole blocks are dropped or
//! appended as it does, zones are never re-binned.

pub mod boundary;
pub mod error;
pub mod geometry;

pub use boundary::{Boundary, BoundaryMotion, MeshBoundaries};
pub use error::{MeshError, MeshResult};
pub use geometry::{BlockGeometry, MeshSpec, face_area, shell_volume};
