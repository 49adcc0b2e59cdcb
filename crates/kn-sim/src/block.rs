//! A block of zones and its per-stage update.

use kn_core::constants::LIGHT_SPEED;
use kn_hydro::{Conserved, Primitive, RiemannFlux};
use kn_mesh::{BlockGeometry, face_area};
use serde::{Deserialize, Serialize};

use crate::scheme::HydroScheme;

/// Ghost zones on each side of a block.
pub const NUM_GUARD: usize = 2;

/// Ghost primitives for one block, innermost first on each side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ghosts {
    pub left: [Primitive; NUM_GUARD],
    pub right: [Primitive; NUM_GUARD],
}

/// Integrated mass quantities from one stage of one block, per steradian.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StageReport {
    /// Mass flux into the block through its inner face (g/s)
    pub inner_mass_rate: f64,
    /// Mass flux out of the block through its outer face (g/s)
    pub outer_mass_rate: f64,
    /// Mass added by flooring (g)
    pub floor_mass: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Block {
    pub geometry: BlockGeometry,
    pub conserved: Vec<Conserved>,
    pub primitive: Vec<Primitive>,
    /// Consecutive steps each zone has needed a floor
    pub floor_count: Vec<u32>,
    #[serde(skip)]
    conserved_start: Vec<Conserved>,
    #[serde(skip)]
    floored: Vec<bool>,
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.geometry == other.geometry
            && self.conserved == other.conserved
            && self.primitive == other.primitive
            && self.floor_count == other.floor_count
    }
}

impl Block {
    /// Build a block from zone primitives, clamping them onto the floors.
    pub fn from_primitive(
        geometry: BlockGeometry,
        primitive: Vec<Primitive>,
        scheme: &HydroScheme,
    ) -> Self {
        let primitive: Vec<Primitive> = primitive
            .into_iter()
            .map(|p| scheme.floors.apply(p).0)
            .collect();
        let conserved = primitive
            .iter()
            .map(|p| scheme.eos.conserved_from_primitive(p))
            .collect();
        let n = primitive.len();
        Self {
            geometry,
            conserved,
            primitive,
            floor_count: vec![0; n],
            conserved_start: Vec::new(),
            floored: Vec::new(),
        }
    }

    pub fn num_zones(&self) -> usize {
        self.primitive.len()
    }

    /// Rest mass per steradian.
    pub fn total_mass(&self) -> f64 {
        self.conserved
            .iter()
            .enumerate()
            .map(|(i, u)| u.lab_density * self.geometry.zone_volume(i))
            .sum()
    }

    /// Largest stable step, `min(Δr / (λ c))` over the zones.
    pub fn max_time_step(&self, scheme: &HydroScheme) -> f64 {
        self.primitive
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let speed = scheme.eos.max_wave_speed(p).max(f64::MIN_POSITIVE);
                self.geometry.zone_width(i) / (speed * LIGHT_SPEED)
            })
            .fold(f64::INFINITY, f64::min)
    }

    /// Light-crossing time of the narrowest zone.
    pub fn light_crossing_time(&self) -> f64 {
        self.geometry.min_zone_width() / LIGHT_SPEED
    }

    /// Record the start-of-step state and clear the floor flags.
    pub fn begin_step(&mut self) {
        self.conserved_start.clone_from(&self.conserved);
        self.floored.clear();
        self.floored.resize(self.num_zones(), false);
    }

    /// Advance through one Runge-Kutta stage:
    /// `U ← w U^n + (1 - w)(U + dt L(U))`, then recover primitives.
    pub fn stage(
        &mut self,
        ghosts: &Ghosts,
        scheme: &HydroScheme,
        dt: f64,
        weight: f64,
    ) -> StageReport {
        let fluxes = self.face_fluxes(ghosts, scheme);
        let n = self.num_zones();

        for i in 0..n {
            let a_l = face_area(self.geometry.faces[i]);
            let a_r = face_area(self.geometry.faces[i + 1]);
            let vol = self.geometry.zone_volume(i);
            let mut l = (fluxes[i + 1].flux * a_r - fluxes[i].flux * a_l) * (-LIGHT_SPEED / vol);
            l.momentum += self.primitive[i].gas_pressure * (a_r - a_l) * LIGHT_SPEED / vol;

            let advanced = self.conserved[i] + l * dt;
            self.conserved[i] = if weight == 0.0 {
                advanced
            } else {
                self.conserved_start[i] * weight + advanced * (1.0 - weight)
            };
        }

        let floor_mass = (0..n).map(|i| self.recover(i, scheme)).sum();

        let faces = &self.geometry.faces;
        StageReport {
            inner_mass_rate: fluxes[0].flux.lab_density * face_area(faces[0]) * LIGHT_SPEED,
            outer_mass_rate: fluxes[n].flux.lab_density * face_area(faces[n]) * LIGHT_SPEED,
            floor_mass,
        }
    }

    /// Riemann fluxes at the `n + 1` faces of the block.
    fn face_fluxes(&self, ghosts: &Ghosts, scheme: &HydroScheme) -> Vec<RiemannFlux> {
        let mut ext = Vec::with_capacity(self.num_zones() + 2 * NUM_GUARD);
        ext.extend_from_slice(&ghosts.left);
        ext.extend_from_slice(&self.primitive);
        ext.extend_from_slice(&ghosts.right);

        (0..=self.num_zones())
            .map(|j| {
                let (l, r) = scheme.plm.face_states(&ext, j + NUM_GUARD);
                scheme.riemann_solver.solve(&scheme.eos, &l, &r)
            })
            .collect()
    }

    /// Recover the primitive state of zone `i`, flooring it when recovery
    /// fails or lands below the floors. Returns the mass added by flooring.
    fn recover(&mut self, i: usize, scheme: &HydroScheme) -> f64 {
        let u = self.conserved[i];
        let previous = self.primitive[i];
        let recovered = scheme
            .eos
            .primitive_from_conserved(&u, previous.gas_pressure)
            .or_else(|_| scheme.eos.primitive_from_conserved(&u, 0.0));

        let candidate = match recovered {
            Ok(p) => p,
            Err(_) => Primitive {
                mass_density: u.lab_density / previous.lorentz_factor(),
                scalar: if u.lab_density > 0.0 {
                    u.scalar / u.lab_density
                } else {
                    previous.scalar
                },
                ..previous
            },
        };
        let (p, clamped) = scheme.floors.apply(candidate);
        self.primitive[i] = p;

        if recovered.is_ok() && !clamped {
            return 0.0;
        }
        if let Some(flag) = self.floored.get_mut(i) {
            *flag = true;
        }
        let fixed = scheme.eos.conserved_from_primitive(&p);
        let added = (fixed.lab_density - u.lab_density) * self.geometry.zone_volume(i);
        self.conserved[i] = fixed;
        added
    }

    /// Update consecutive floor counters after a step. Returns the zone with
    /// the longest streak and its length.
    pub fn end_step(&mut self) -> Option<(usize, u32)> {
        let mut worst: Option<(usize, u32)> = None;
        for (i, count) in self.floor_count.iter_mut().enumerate() {
            if self.floored.get(i).copied().unwrap_or(false) {
                *count += 1;
                if worst.is_none_or(|(_, c)| *count > c) {
                    worst = Some((i, *count));
                }
            } else {
                *count = 0;
            }
        }
        worst
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::IntegratorType;
    use kn_core::BlockIndex;
    use kn_hydro::RiemannSolverKind;
    use kn_mesh::MeshSpec;

    fn scheme() -> HydroScheme {
        HydroScheme::new(4.0 / 3.0, 1.5, 0.3, RiemannSolverKind::HLLC, IntegratorType::RK2).unwrap()
    }

    fn geometry() -> BlockGeometry {
        let spec = MeshSpec {
            inner_radius: 1e9,
            outer_radius: 1e10,
            inner_excision_speed: 0.0,
            outer_excision_speed: 0.0,
            excision_delay: None,
            reference_radius: 1e9,
            num_polar_zones: 64,
            block_size: 8,
        };
        spec.block_geometry(BlockIndex(0))
    }

    #[test]
    fn uniform_pressure_at_rest_stays_at_rest() {
        let s = scheme();
        let state = Primitive::new(1.0, 0.0, 1e-2, 0.0);
        let mut block = Block::from_primitive(geometry(), vec![state; 8], &s);
        let ghosts = Ghosts {
            left: [state; NUM_GUARD],
            right: [state; NUM_GUARD],
        };
        let dt = 0.3 * block.light_crossing_time();
        block.begin_step();
        let report = block.stage(&ghosts, &s, dt, 0.0);
        assert_eq!(report.floor_mass, 0.0);
        for p in &block.primitive {
            assert!(p.gamma_beta.abs() < 1e-10, "{p:?}");
            assert!((p.gas_pressure / 1e-2 - 1.0).abs() < 1e-10);
        }
    }

    #[test]
    fn time_step_stays_above_light_crossing_for_fast_hot_flow() {
        let s = scheme();
        let zones: Vec<Primitive> = (0..8)
            .map(|i| Primitive::new(1.0, 20.0 - 3.0 * i as f64, 10.0, 0.0))
            .collect();
        let block = Block::from_primitive(geometry(), zones, &s);
        let dt = block.max_time_step(&s);
        let light = block.light_crossing_time();
        assert!(dt.is_finite());
        assert!(dt > light, "dt {dt} below light crossing {light}");
        // The fastest signal is just below c.
        let widest = (0..8).map(|i| block.geometry.zone_width(i)).fold(0.0, f64::max);
        assert!(dt < 2.0 * widest / LIGHT_SPEED);
    }

    #[test]
    fn mass_changes_only_through_faces() {
        let s = scheme();
        let inner = Primitive::new(2.0, 0.3, 1e-2, 1.0);
        let outer = Primitive::new(1.0, 0.0, 1e-3, 0.0);
        let zones: Vec<Primitive> = (0..8).map(|i| if i < 4 { inner } else { outer }).collect();
        let mut block = Block::from_primitive(geometry(), zones, &s);
        let ghosts = Ghosts {
            left: [inner; NUM_GUARD],
            right: [outer; NUM_GUARD],
        };
        let m0 = block.total_mass();
        let dt = 0.3 * block.light_crossing_time();
        block.begin_step();
        let r = block.stage(&ghosts, &s, dt, 0.0);
        let m1 = block.total_mass();
        let expected = m0 + dt * (r.inner_mass_rate - r.outer_mass_rate) + r.floor_mass;
        assert!((m1 - expected).abs() <= 1e-12 * m0);
    }

    #[test]
    fn unrecoverable_zone_is_floored_and_counted() {
        let s = scheme();
        let state = Primitive::new(1.0, 0.0, 1e-2, 0.0);
        let mut block = Block::from_primitive(geometry(), vec![state; 8], &s);
        block.begin_step();
        block.conserved[3] = Conserved::new(1.0, 10.0, 0.5, 0.0);
        let added = block.recover(3, &s);
        assert!(block.primitive[3].is_physical());
        assert!(added.is_finite());
        assert_eq!(block.end_step(), Some((3, 1)));
        block.begin_step();
        assert_eq!(block.end_step(), None);
        assert_eq!(block.floor_count[3], 0);
    }
}
