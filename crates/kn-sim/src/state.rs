use kn_mesh::MeshBoundaries;
use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::clock::RunClock;
use crate::ledger::MassLedger;

/// Complete mutable state of a run; enough to resume it bit for bit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub clock: RunClock,
    pub boundaries: MeshBoundaries,
    /// Blocks ordered by radius, contiguous on the block lattice
    pub blocks: Vec<Block>,
    pub ledger: MassLedger,
    /// Step size fixed at startup when the time step is not adaptive
    pub fixed_time_step: Option<f64>,
}

impl State {
    pub fn total_mass(&self) -> f64 {
        self.blocks.iter().map(Block::total_mass).sum()
    }

    pub fn num_zones(&self) -> usize {
        self.blocks.iter().map(Block::num_zones).sum()
    }

    /// Innermost face of the mesh.
    pub fn mesh_inner_face(&self) -> Option<f64> {
        self.blocks.first().map(|b| b.geometry.inner_radius())
    }

    /// Outermost face of the mesh.
    pub fn mesh_outer_face(&self) -> Option<f64> {
        self.blocks.last().map(|b| b.geometry.outer_radius())
    }
}
