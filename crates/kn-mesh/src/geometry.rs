//! Logarithmic zone spacing and the fixed block lattice.

use std::f64::consts::PI;

use kn_core::{BlockIndex, ensure_finite, ensure_positive};
use serde::{Deserialize, Serialize};

use crate::error::{MeshError, MeshResult};

/// Area of a spherical face per steradian.
pub fn face_area(radius: f64) -> f64 {
    radius * radius
}

/// Volume of a spherical shell per steradian.
pub fn shell_volume(r0: f64, r1: f64) -> f64 {
    (r1 * r1 * r1 - r0 * r0 * r0) / 3.0
}

/// Runtime description of the radial mesh.
///
/// Radii are in cm, speeds in cm/s, times in s.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshSpec {
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub inner_excision_speed: f64,
    pub outer_excision_speed: f64,
    pub excision_delay: Option<f64>,
    pub reference_radius: f64,
    pub num_polar_zones: usize,
    pub block_size: usize,
}

impl MeshSpec {
    pub fn validate(&self) -> MeshResult<()> {
        ensure_positive(self.inner_radius, "mesh.inner_radius")?;
        ensure_positive(self.outer_radius, "mesh.outer_radius")?;
        ensure_positive(self.reference_radius, "mesh.reference_radius")?;
        if self.inner_radius >= self.outer_radius {
            return Err(MeshError::BoundaryCollision {
                inner: self.inner_radius,
                outer: self.outer_radius,
            });
        }
        if self.num_polar_zones == 0 {
            return Err(MeshError::InvalidGeometry {
                what: "mesh.num_polar_zones must be at least 1",
            });
        }
        if self.block_size == 0 {
            return Err(MeshError::InvalidGeometry {
                what: "mesh.block_size must be at least 1",
            });
        }
        ensure_finite(self.inner_excision_speed, "mesh.inner_excision_speed")?;
        ensure_finite(self.outer_excision_speed, "mesh.outer_excision_speed")?;
        // Blocks are only ever excised at the inner edge, never prepended.
        if self.inner_excision_speed < 0.0 {
            return Err(MeshError::InwardExcision {
                speed: self.inner_excision_speed,
            });
        }
        if let Some(delay) = self.excision_delay {
            if !(delay >= 0.0 && delay.is_finite()) {
                return Err(MeshError::InvalidGeometry {
                    what: "mesh.excision_delay must be non-negative",
                });
            }
        }
        Ok(())
    }

    /// Logarithmic zone spacing `Δln r`.
    pub fn zone_log_spacing(&self) -> f64 {
        PI / self.num_polar_zones as f64
    }

    /// Logarithmic extent of one block.
    pub fn block_log_length(&self) -> f64 {
        self.block_size as f64 * self.zone_log_spacing()
    }

    /// Radius of the face with global lattice index `k`.
    ///
    /// Every face radius is computed through this function so that adjacent
    /// blocks agree bit for bit on their shared face.
    pub fn face_radius(&self, k: i64) -> f64 {
        self.reference_radius * (k as f64 * self.zone_log_spacing()).exp()
    }

    /// Inner and outer radius of a block.
    pub fn block_extent(&self, index: BlockIndex) -> (f64, f64) {
        let bs = self.block_size as i64;
        let k = index.get() as i64 * bs;
        (self.face_radius(k), self.face_radius(k + bs))
    }

    /// Smallest contiguous block range covering `[inner, outer]`.
    pub fn covering_blocks(&self, inner: f64, outer: f64) -> (BlockIndex, BlockIndex) {
        let l = self.block_log_length();
        let first = ((inner / self.reference_radius).ln() / l).floor() as i32;
        let last = ((outer / self.reference_radius).ln() / l).ceil() as i32 - 1;
        (BlockIndex(first), BlockIndex(last.max(first)))
    }

    /// Blocks making up the initial mesh, innermost first.
    pub fn initial_blocks(&self) -> Vec<BlockIndex> {
        let (first, last) = self.covering_blocks(self.inner_radius, self.outer_radius);
        (first.get()..=last.get()).map(BlockIndex).collect()
    }

    pub fn block_geometry(&self, index: BlockIndex) -> BlockGeometry {
        BlockGeometry::new(self, index)
    }
}

/// Zone faces and derived metric quantities of one block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockGeometry {
    pub index: BlockIndex,
    pub faces: Vec<f64>,
}

impl BlockGeometry {
    pub fn new(spec: &MeshSpec, index: BlockIndex) -> Self {
        let bs = spec.block_size as i64;
        let k0 = index.get() as i64 * bs;
        let faces = (0..=bs).map(|j| spec.face_radius(k0 + j)).collect();
        Self { index, faces }
    }

    pub fn num_zones(&self) -> usize {
        self.faces.len() - 1
    }

    pub fn inner_radius(&self) -> f64 {
        self.faces[0]
    }

    pub fn outer_radius(&self) -> f64 {
        self.faces[self.faces.len() - 1]
    }

    /// Geometric mean of the bounding faces, the natural centre on a log grid.
    pub fn zone_center(&self, i: usize) -> f64 {
        (self.faces[i] * self.faces[i + 1]).sqrt()
    }

    pub fn zone_width(&self, i: usize) -> f64 {
        self.faces[i + 1] - self.faces[i]
    }

    pub fn zone_volume(&self, i: usize) -> f64 {
        shell_volume(self.faces[i], self.faces[i + 1])
    }

    pub fn zone_centers(&self) -> Vec<f64> {
        (0..self.num_zones()).map(|i| self.zone_center(i)).collect()
    }

    pub fn min_zone_width(&self) -> f64 {
        (0..self.num_zones())
            .map(|i| self.zone_width(i))
            .fold(f64::INFINITY, f64::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> MeshSpec {
        MeshSpec {
            inner_radius: 1e9,
            outer_radius: 1e11,
            inner_excision_speed: 0.0,
            outer_excision_speed: 0.0,
            excision_delay: None,
            reference_radius: 1e9,
            num_polar_zones: 64,
            block_size: 16,
        }
    }

    #[test]
    fn initial_blocks_cover_domain() {
        let s = spec();
        let blocks = s.initial_blocks();
        let first = s.block_extent(blocks[0]);
        let last = s.block_extent(*blocks.last().unwrap());
        assert!(first.0 <= s.inner_radius);
        assert!(first.1 > s.inner_radius);
        assert!(last.1 >= s.outer_radius);
        assert!(last.0 < s.outer_radius);
    }

    #[test]
    fn neighbouring_blocks_share_faces() {
        let s = spec();
        let a = s.block_geometry(BlockIndex(2));
        let b = s.block_geometry(BlockIndex(3));
        assert_eq!(a.outer_radius(), b.inner_radius());
        assert_eq!(a.num_zones(), 16);
    }

    #[test]
    fn zones_are_logarithmically_spaced() {
        let s = spec();
        let g = s.block_geometry(BlockIndex(0));
        let dlogr = s.zone_log_spacing();
        for i in 0..g.num_zones() {
            let ratio = (g.faces[i + 1] / g.faces[i]).ln();
            assert!((ratio - dlogr).abs() < 1e-12);
            assert!(g.zone_center(i) > g.faces[i] && g.zone_center(i) < g.faces[i + 1]);
        }
    }

    #[test]
    fn negative_indices_lie_below_reference() {
        let s = MeshSpec {
            inner_radius: 1e8,
            ..spec()
        };
        let blocks = s.initial_blocks();
        assert!(blocks[0].get() < 0);
        assert!(s.block_extent(blocks[0]).0 <= s.inner_radius);
    }

    #[test]
    fn shell_volumes_sum() {
        let s = spec();
        let g = s.block_geometry(BlockIndex(1));
        let total: f64 = (0..g.num_zones()).map(|i| g.zone_volume(i)).sum();
        let whole = shell_volume(g.inner_radius(), g.outer_radius());
        assert!((total - whole).abs() <= 1e-12 * whole);
    }

    #[test]
    fn validate_rejects_inverted_radii() {
        let s = MeshSpec {
            inner_radius: 2e11,
            ..spec()
        };
        assert!(matches!(
            s.validate(),
            Err(MeshError::BoundaryCollision { .. })
        ));
        let s = MeshSpec {
            block_size: 0,
            ..spec()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn validate_rejects_inward_inner_boundary() {
        let s = MeshSpec {
            inner_excision_speed: -5e10,
            ..spec()
        };
        assert_eq!(
            s.validate(),
            Err(MeshError::InwardExcision { speed: -5e10 })
        );
        let s = MeshSpec {
            outer_excision_speed: -1e9,
            ..spec()
        };
        assert!(s.validate().is_ok());
        let s = MeshSpec {
            outer_excision_speed: f64::NAN,
            ..spec()
        };
        assert!(matches!(
            s.validate(),
            Err(MeshError::InvalidGeometry {
                what: "mesh.outer_excision_speed"
            })
        ));
    }
}
