//! Radial data products for post-processing.

use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::state::State;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockProducts {
    pub index: i32,
    /// Zone faces, one more than the number of zones
    pub radial_vertices: Vec<f64>,
    pub comoving_mass_density: Vec<f64>,
    pub gas_pressure: Vec<f64>,
    pub radial_four_velocity: Vec<f64>,
    pub scalar: Vec<f64>,
}

impl From<&Block> for BlockProducts {
    fn from(block: &Block) -> Self {
        let column = |f: fn(&kn_hydro::Primitive) -> f64| block.primitive.iter().map(f).collect();
        Self {
            index: block.geometry.index.get(),
            radial_vertices: block.geometry.faces.clone(),
            comoving_mass_density: column(|p| p.mass_density),
            gas_pressure: column(|p| p.gas_pressure),
            radial_four_velocity: column(|p| p.gamma_beta),
            scalar: column(|p| p.scalar),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Products {
    pub time: f64,
    pub iteration: u64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub blocks: Vec<BlockProducts>,
}

impl From<&State> for Products {
    fn from(state: &State) -> Self {
        Self {
            time: state.clock.time,
            iteration: state.clock.iteration,
            inner_radius: state.boundaries.inner.radius,
            outer_radius: state.boundaries.outer.radius,
            blocks: state.blocks.iter().map(BlockProducts::from).collect(),
        }
    }
}
