//! The run driver: owns the mesh, the clock and the scenario, takes steps,
//! moves the boundaries and fires recurring tasks.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use kn_core::timing::{AccumulatingTimer, Timer, mzps};
use kn_hydro::Primitive;
use kn_mesh::{MeshBoundaries, MeshSpec};
use kn_models::{InitialModel, Scenario};
use rayon::prelude::*;
use tracing::{debug, error, info, warn};

use crate::block::{Block, Ghosts, NUM_GUARD, StageReport};
use crate::clock::RunClock;
use crate::error::{SimError, SimResult};
use crate::ledger::MassLedger;
use crate::products::Products;
use crate::scheme::HydroScheme;
use crate::state::State;
use crate::tasks::{Progress, Snapshot, TaskHandler, Tasks};

/// Static description of a run.
#[derive(Clone, Debug)]
pub struct Setup {
    pub scheme: HydroScheme,
    pub mesh: MeshSpec,
    /// Polar angle of the simulated ray (rad)
    pub polar_angle: f64,
    pub start_time: f64,
    /// Worker threads; `None` uses every hardware thread
    pub num_threads: Option<usize>,
}

/// When to stop and how often to look up from stepping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunControl {
    pub final_time: f64,
    /// Steps taken between checks for due tasks
    pub fold: usize,
    pub checkpoint_interval: f64,
    pub products_interval: Option<f64>,
}

/// Shared flag used to ask a running driver to stop after the current fold.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub time: f64,
    /// Steps taken during this call
    pub iterations: u64,
    pub checkpoints_written: usize,
    pub checkpoint_failures: usize,
    pub products_written: usize,
    pub products_failures: usize,
    pub wall_seconds: f64,
    /// Mean wall time of a single step
    pub mean_step_seconds: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepReport {
    pub dt: f64,
    /// Whether the step was shortened to land on the final time
    pub truncated: bool,
}

pub struct Driver {
    setup: Setup,
    scenario: Scenario,
    state: State,
    tasks: Tasks,
    pool: rayon::ThreadPool,
    stop: StopHandle,
}

impl Driver {
    /// Set up a fresh run at `setup.start_time`.
    pub fn new(setup: Setup, mut scenario: Scenario) -> SimResult<Self> {
        setup.mesh.validate()?;
        scenario.validate()?;
        warn_on_cfl(&setup.scheme);

        let geometries: Vec<_> = setup
            .mesh
            .initial_blocks()
            .into_iter()
            .map(|index| setup.mesh.block_geometry(index))
            .collect();
        let (Some(first), Some(last)) = (geometries.first(), geometries.last()) else {
            return Err(SimError::InvalidArg {
                what: "mesh has no blocks",
            });
        };
        scenario.prepare(first.inner_radius(), last.outer_radius())?;

        let blocks: Vec<Block> = geometries
            .into_iter()
            .map(|g| {
                let zones =
                    scenario.initialize(&g.zone_centers(), setup.polar_angle, setup.start_time);
                Block::from_primitive(g, zones, &setup.scheme)
            })
            .collect();

        let mut state = State {
            clock: RunClock::new(setup.start_time),
            boundaries: MeshBoundaries::new(&setup.mesh, setup.start_time),
            blocks,
            ledger: MassLedger::default(),
            fixed_time_step: None,
        };
        state.ledger = MassLedger::new(state.total_mass());
        if !setup.scheme.adaptive_time_step {
            state.fixed_time_step = Some(fixed_time_step(&setup.scheme, &state));
        }

        info!(
            model = scenario.name(),
            blocks = state.blocks.len(),
            zones = state.num_zones(),
            inner_radius = state.boundaries.inner.radius,
            outer_radius = state.boundaries.outer.radius,
            "initialized mesh"
        );

        let tasks = Tasks::new(setup.start_time);
        Self::assemble(setup, scenario, state, tasks)
    }

    /// Continue a run from a saved state and task cadence.
    pub fn resume(
        setup: Setup,
        mut scenario: Scenario,
        mut state: State,
        tasks: Tasks,
    ) -> SimResult<Self> {
        setup.mesh.validate()?;
        scenario.validate()?;
        warn_on_cfl(&setup.scheme);
        state.boundaries.check()?;

        let (Some(inner), Some(outer)) = (state.mesh_inner_face(), state.mesh_outer_face()) else {
            return Err(SimError::InvalidArg {
                what: "saved state has no blocks",
            });
        };
        scenario.prepare(inner, outer)?;

        if !setup.scheme.adaptive_time_step && state.fixed_time_step.is_none() {
            state.fixed_time_step = Some(fixed_time_step(&setup.scheme, &state));
        }
        if setup.scheme.adaptive_time_step {
            state.fixed_time_step = None;
        }

        info!(
            model = scenario.name(),
            time = state.clock.time,
            iteration = state.clock.iteration,
            blocks = state.blocks.len(),
            "resumed run"
        );
        Self::assemble(setup, scenario, state, tasks)
    }

    fn assemble(setup: Setup, scenario: Scenario, state: State, tasks: Tasks) -> SimResult<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(setup.num_threads.unwrap_or(0))
            .build()?;
        Ok(Self {
            setup,
            scenario,
            state,
            tasks,
            pool,
            stop: StopHandle::default(),
        })
    }

    pub fn setup(&self) -> &Setup {
        &self.setup
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn tasks(&self) -> &Tasks {
        &self.tasks
    }

    pub fn into_state(self) -> State {
        self.state
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Share a stop flag created before the driver existed.
    pub fn with_stop_handle(mut self, stop: StopHandle) -> Self {
        self.stop = stop;
        self
    }

    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn products(&self) -> Products {
        Products::from(&self.state)
    }

    /// The step the time-step policy asks for, before any truncation.
    pub fn time_step(&self) -> f64 {
        if let Some(dt) = self.state.fixed_time_step {
            return dt;
        }
        let scheme = &self.setup.scheme;
        let blocks = &self.state.blocks;
        let dt = self.pool.install(|| {
            blocks
                .par_iter()
                .map(|b| b.max_time_step(scheme))
                .reduce(|| f64::INFINITY, f64::min)
        });
        scheme.cfl_number * dt
    }

    /// Take one step without passing `final_time`.
    pub fn advance(&mut self, final_time: f64) -> SimResult<StepReport> {
        if self.state.clock.is_terminal(final_time) {
            return Err(SimError::InvalidArg {
                what: "run has already reached its final time",
            });
        }
        let (dt, truncated) = self.state.clock.clamp_step(self.time_step(), final_time);
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(SimError::InvalidArg {
                what: "time step must be positive and finite",
            });
        }

        let t0 = self.state.clock.time;
        let integrator = self.setup.scheme.integrator;
        for block in &mut self.state.blocks {
            block.begin_step();
        }

        for (s, (&weight, &fraction)) in integrator
            .stage_weights()
            .iter()
            .zip(integrator.stage_times())
            .enumerate()
        {
            let ghosts = self.ghost_snapshot(t0 + fraction * dt);
            let scheme = &self.setup.scheme;
            let blocks = &mut self.state.blocks;
            let reports: Vec<StageReport> = self.pool.install(|| {
                blocks
                    .par_iter_mut()
                    .zip(ghosts.par_iter())
                    .map(|(block, g)| block.stage(g, scheme, dt, weight))
                    .collect()
            });

            let carry = integrator.stage_carry(s);
            if let (Some(first), Some(last)) = (reports.first(), reports.last()) {
                let net = last.outer_mass_rate - first.inner_mass_rate;
                self.state.ledger.boundary_outflow += carry * (1.0 - weight) * dt * net;
            }
            let floor_mass: f64 = reports.iter().map(|r| r.floor_mass).sum();
            self.state.ledger.floored += carry * floor_mass;
        }

        self.check_floors()?;
        self.state.boundaries.advance(t0, dt)?;
        self.state.clock.tick(dt, final_time, truncated);
        self.remesh()?;

        Ok(StepReport { dt, truncated })
    }

    /// Ghost zones for every block, taken from neighbours or the domain
    /// boundary conditions at `time`.
    fn ghost_snapshot(&self, time: f64) -> Vec<Ghosts> {
        let blocks = &self.state.blocks;
        let inner = match blocks.first() {
            Some(b) => self.inner_boundary_state(b.geometry.inner_radius(), time),
            None => return Vec::new(),
        };
        let outflow = blocks
            .last()
            .and_then(|b| b.primitive.last().copied())
            .unwrap_or(inner);

        (0..blocks.len())
            .map(|k| {
                let mut left = [inner; NUM_GUARD];
                let mut slot = NUM_GUARD;
                'left: for b in blocks[..k].iter().rev() {
                    for p in b.primitive.iter().rev() {
                        if slot == 0 {
                            break 'left;
                        }
                        slot -= 1;
                        left[slot] = *p;
                    }
                }

                let mut right = [outflow; NUM_GUARD];
                let mut slot = 0;
                'right: for b in &blocks[k + 1..] {
                    for p in &b.primitive {
                        if slot == NUM_GUARD {
                            break 'right;
                        }
                        right[slot] = *p;
                        slot += 1;
                    }
                }
                Ghosts { left, right }
            })
            .collect()
    }

    fn inner_boundary_state(&self, radius: f64, time: f64) -> Primitive {
        let p = self
            .scenario
            .inner_boundary_condition((radius, self.setup.polar_angle), time);
        self.setup.scheme.floors.apply(p).0
    }

    fn check_floors(&mut self) -> SimResult<()> {
        let max = self.setup.scheme.floors.max_consecutive_floors;
        for block in &mut self.state.blocks {
            if let Some((i, consecutive)) = block.end_step() {
                let radius = block.geometry.zone_center(i);
                debug!(radius, consecutive, "zone floored");
                if consecutive > max {
                    return Err(SimError::Diverged {
                        radius,
                        consecutive,
                    });
                }
            }
        }
        Ok(())
    }

    /// Drop blocks that have left the domain and append blocks the outer
    /// boundary has moved into.
    fn remesh(&mut self) -> SimResult<()> {
        let inner = self.state.boundaries.inner.radius;
        let outer = self.state.boundaries.outer.radius;
        let time = self.state.clock.time;
        let blocks = &mut self.state.blocks;

        while blocks.len() > 1 && blocks[0].geometry.outer_radius() <= inner {
            let block = blocks.remove(0);
            let mass = block.total_mass();
            self.state.ledger.excised += mass;
            info!(block = %block.geometry.index, radius = block.geometry.outer_radius(), mass, time, "excised inner block");
        }
        while blocks.len() > 1
            && blocks
                .last()
                .is_some_and(|b| b.geometry.inner_radius() >= outer)
        {
            if let Some(block) = blocks.pop() {
                let mass = block.total_mass();
                self.state.ledger.excised += mass;
                info!(block = %block.geometry.index, radius = block.geometry.inner_radius(), mass, time, "excised outer block");
            }
        }

        loop {
            let Some(last) = blocks.last() else {
                return Err(SimError::InvalidArg {
                    what: "mesh has no blocks",
                });
            };
            if last.geometry.outer_radius() >= outer {
                break;
            }
            let geometry = self.setup.mesh.block_geometry(last.geometry.index.next());
            let zones =
                self.scenario
                    .initialize(&geometry.zone_centers(), self.setup.polar_angle, time);
            let block = Block::from_primitive(geometry, zones, &self.setup.scheme);
            let mass = block.total_mass();
            self.state.ledger.injected += mass;
            info!(block = %block.geometry.index, radius = block.geometry.outer_radius(), mass, time, "appended outer block");
            blocks.push(block);
        }
        Ok(())
    }

    /// Step to `control.final_time`, performing due tasks every `fold` steps.
    pub fn run<H: TaskHandler>(
        &mut self,
        control: &RunControl,
        handler: &mut H,
    ) -> SimResult<RunSummary> {
        if control.fold == 0 {
            return Err(SimError::InvalidArg {
                what: "fold must be at least 1",
            });
        }
        if !(control.checkpoint_interval > 0.0) {
            return Err(SimError::InvalidArg {
                what: "checkpoint_interval must be positive",
            });
        }

        let timer = Timer::start("run");
        let start_iteration = self.state.clock.iteration;
        let mut summary = RunSummary {
            outcome: RunOutcome::Completed,
            time: self.state.clock.time,
            iterations: 0,
            checkpoints_written: 0,
            checkpoint_failures: 0,
            products_written: 0,
            products_failures: 0,
            wall_seconds: 0.0,
            mean_step_seconds: 0.0,
        };
        let step_timer = AccumulatingTimer::new();
        info!(
            time = self.state.clock.time,
            final_time = control.final_time,
            threads = self.num_threads(),
            "starting run"
        );

        self.perform_tasks(control, handler, &mut summary);

        while !self.state.clock.is_terminal(control.final_time) {
            if self.stop.is_stop_requested() {
                info!(time = self.state.clock.time, "stop requested");
                summary.outcome = RunOutcome::Stopped;
                break;
            }

            let fold_timer = Timer::start("fold");
            let mut zone_updates = 0;
            let mut dt = 0.0;
            for _ in 0..control.fold {
                if self.state.clock.is_terminal(control.final_time) {
                    break;
                }
                zone_updates += self.state.num_zones();
                let step = Timer::start("step");
                dt = self.advance(control.final_time)?.dt;
                step_timer.record(step.stop());
            }

            let progress = Progress {
                iteration: self.state.clock.iteration,
                time: self.state.clock.time,
                final_time: control.final_time,
                dt,
                num_blocks: self.state.blocks.len(),
                num_zones: self.state.num_zones(),
                mzps: mzps(zone_updates, fold_timer.stop()),
            };
            if self.tasks.iteration_message.is_due(progress.time, 0.0) {
                self.tasks.iteration_message.advance_past(progress.time, 0.0);
                info!(
                    "[{:05}] t={:.5} dt={:.3e} blocks={} Mzps={:.2}",
                    progress.iteration, progress.time, progress.dt, progress.num_blocks, progress.mzps
                );
            }
            handler.progress(&progress);
            self.perform_tasks(control, handler, &mut summary);
        }

        summary.time = self.state.clock.time;
        summary.iterations = self.state.clock.iteration - start_iteration;
        summary.wall_seconds = timer.stop();
        summary.mean_step_seconds = step_timer.average_seconds();
        info!(
            time = summary.time,
            iterations = summary.iterations,
            checkpoints = summary.checkpoints_written,
            checkpoint_failures = summary.checkpoint_failures,
            seconds = summary.wall_seconds,
            "run finished"
        );
        Ok(summary)
    }

    fn perform_tasks<H: TaskHandler>(
        &mut self,
        control: &RunControl,
        handler: &mut H,
        summary: &mut RunSummary,
    ) {
        let time = self.state.clock.time;

        if self
            .tasks
            .write_checkpoint
            .is_due(time, control.checkpoint_interval)
        {
            let number = self
                .tasks
                .write_checkpoint
                .advance_past(time, control.checkpoint_interval);
            let snapshot = Snapshot {
                number,
                state: &self.state,
                tasks: &self.tasks,
            };
            match handler.write_checkpoint(snapshot) {
                Ok(()) => {
                    summary.checkpoints_written += 1;
                    info!(number, time, "wrote checkpoint");
                }
                Err(e) => {
                    summary.checkpoint_failures += 1;
                    error!(number, time, error = %e, "failed to write checkpoint");
                }
            }
        }

        if let Some(interval) = control.products_interval {
            if self.tasks.write_products.is_due(time, interval) {
                let number = self.tasks.write_products.advance_past(time, interval);
                match handler.write_products(number, &self.products()) {
                    Ok(()) => {
                        summary.products_written += 1;
                        debug!(number, time, "wrote products");
                    }
                    Err(e) => {
                        summary.products_failures += 1;
                        error!(number, time, error = %e, "failed to write products");
                    }
                }
            }
        }
    }
}

fn warn_on_cfl(scheme: &HydroScheme) {
    if scheme.cfl_number > 1.0 {
        warn!(
            cfl_number = scheme.cfl_number,
            "cfl_number above 1 is not a stable Courant fraction"
        );
    }
}

/// `cfl · min(Δr) / c` over the mesh.
fn fixed_time_step(scheme: &HydroScheme, state: &State) -> f64 {
    let crossing = state
        .blocks
        .iter()
        .map(Block::light_crossing_time)
        .fold(f64::INFINITY, f64::min);
    scheme.cfl_number * crossing
}
