//! Run execution service: fresh runs from a configuration and resumed runs
//! from a checkpoint, with checkpoints and products written to the output
//! directory.

use std::path::{Path, PathBuf};
use std::time::Instant;

use kn_project::Configuration;
use kn_results::{CheckpointRef, CheckpointStore, ResultsError, RunManifest};
use kn_sim::{
    Driver, Products, Progress, RunOutcome, RunSummary, Snapshot, StopHandle, TaskHandler,
};
use tracing::info;

use crate::compile::compile;
use crate::error::AppResult;
use crate::progress::{RunProgress, RunProgressEvent, RunStage};

pub const SOLVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Replaces `control.final_time`
    pub final_time: Option<f64>,
    /// Replaces `control.output_directory`
    pub output_directory: Option<PathBuf>,
    /// Flag polled between folds; set it to end the run early
    pub stop: Option<StopHandle>,
}

#[derive(Debug, Clone)]
pub struct RunResponse {
    pub manifest: RunManifest,
    pub summary: RunSummary,
    pub output_directory: PathBuf,
    pub last_checkpoint: Option<PathBuf>,
}

type ProgressCallback<'a> = Option<&'a mut dyn FnMut(RunProgressEvent)>;

fn emit(
    progress_cb: &mut ProgressCallback<'_>,
    stage: RunStage,
    started: Instant,
    message: Option<String>,
    progress: Option<RunProgress>,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent {
            stage,
            elapsed_wall_s: started.elapsed().as_secs_f64(),
            message,
            progress,
        });
    }
}

/// Writes checkpoints and products into a [`CheckpointStore`] and forwards
/// progress to an optional callback.
pub struct StoreHandler<'a, 'cb> {
    store: CheckpointStore,
    configuration: &'a Configuration,
    start_time: f64,
    started: Instant,
    progress_cb: ProgressCallback<'cb>,
    last_checkpoint: Option<PathBuf>,
}

impl<'a, 'cb> StoreHandler<'a, 'cb> {
    pub fn new(store: CheckpointStore, configuration: &'a Configuration) -> Self {
        Self {
            store,
            configuration,
            start_time: configuration.control.start_time,
            started: Instant::now(),
            progress_cb: None,
            last_checkpoint: None,
        }
    }

    fn with_progress(mut self, progress_cb: ProgressCallback<'cb>, started: Instant) -> Self {
        self.progress_cb = progress_cb;
        self.started = started;
        self
    }

    pub fn last_checkpoint(&self) -> Option<&Path> {
        self.last_checkpoint.as_deref()
    }
}

impl TaskHandler for StoreHandler<'_, '_> {
    type Error = ResultsError;

    fn write_checkpoint(&mut self, snapshot: Snapshot<'_>) -> Result<(), Self::Error> {
        let path = self.store.save_checkpoint(
            snapshot.number,
            CheckpointRef {
                configuration: self.configuration,
                state: snapshot.state,
                tasks: snapshot.tasks,
            },
        )?;
        info!(path = %path.display(), "checkpoint written");
        self.last_checkpoint = Some(path);
        Ok(())
    }

    fn write_products(&mut self, number: usize, products: &Products) -> Result<(), Self::Error> {
        self.store.save_products(number, products)?;
        Ok(())
    }

    fn progress(&mut self, progress: &Progress) {
        let progress = RunProgress {
            sim_time: progress.time,
            final_time: progress.final_time,
            fraction_complete: progress.fraction_complete(self.start_time),
            iteration: progress.iteration,
            num_blocks: progress.num_blocks,
            num_zones: progress.num_zones,
            mzps: progress.mzps,
        };
        emit(
            &mut self.progress_cb,
            RunStage::Running,
            self.started,
            None,
            Some(progress),
        );
    }
}

fn apply_options(config: &mut Configuration, options: &RunOptions) {
    if let Some(final_time) = options.final_time {
        config.control.final_time = final_time;
    }
    if let Some(dir) = &options.output_directory {
        config.control.output_directory = dir.clone();
    }
}

/// Start a run from a configuration.
pub fn run_configuration(config: &Configuration, options: &RunOptions) -> AppResult<RunResponse> {
    run_configuration_with_progress(config, options, None)
}

pub fn run_configuration_with_progress(
    config: &Configuration,
    options: &RunOptions,
    mut progress_cb: ProgressCallback<'_>,
) -> AppResult<RunResponse> {
    let started = Instant::now();
    let mut config = config.clone();
    apply_options(&mut config, options);

    emit(&mut progress_cb, RunStage::Compiling, started, None, None);
    let run = compile(&config)?;

    emit(
        &mut progress_cb,
        RunStage::InitializingMesh,
        started,
        Some(format!("Initializing {}", config.model.name())),
        None,
    );
    let driver = Driver::new(run.setup, run.scenario)?;
    execute(driver, &config, options, progress_cb, started)
}

/// Continue a run from a checkpoint file, writing into the checkpoint's
/// output directory unless overridden.
pub fn resume_from_checkpoint(path: &Path, options: &RunOptions) -> AppResult<RunResponse> {
    resume_from_checkpoint_with_progress(path, options, None)
}

pub fn resume_from_checkpoint_with_progress(
    path: &Path,
    options: &RunOptions,
    mut progress_cb: ProgressCallback<'_>,
) -> AppResult<RunResponse> {
    let started = Instant::now();
    emit(
        &mut progress_cb,
        RunStage::LoadingCheckpoint,
        started,
        Some(format!("Loading {}", path.display())),
        None,
    );
    let checkpoint = kn_results::load_checkpoint(path)?;
    let mut config = checkpoint.configuration;
    apply_options(&mut config, options);

    emit(&mut progress_cb, RunStage::Compiling, started, None, None);
    let run = compile(&config)?;
    let driver = Driver::resume(run.setup, run.scenario, checkpoint.state, checkpoint.tasks)?;
    execute(driver, &config, options, progress_cb, started)
}

fn execute(
    driver: Driver,
    config: &Configuration,
    options: &RunOptions,
    mut progress_cb: ProgressCallback<'_>,
    started: Instant,
) -> AppResult<RunResponse> {
    let mut driver = match &options.stop {
        Some(stop) => driver.with_stop_handle(stop.clone()),
        None => driver,
    };
    let store = CheckpointStore::new(config.control.output_directory.clone())?;
    let manifest = store.save_manifest(config, SOLVER_VERSION)?;
    info!(
        digest = %manifest.config_digest,
        output = %store.root_dir().display(),
        "run manifest written"
    );

    emit(&mut progress_cb, RunStage::Running, started, None, None);
    let control = crate::compile::run_control(config);
    let mut handler = StoreHandler::new(store, config).with_progress(progress_cb, started);
    let summary = driver.run(&control, &mut handler)?;
    let last_checkpoint = handler.last_checkpoint.take();
    let mut progress_cb = handler.progress_cb.take();

    let stage = match summary.outcome {
        RunOutcome::Completed => RunStage::Completed,
        RunOutcome::Stopped => RunStage::Stopped,
    };
    emit(
        &mut progress_cb,
        stage,
        started,
        Some(format!("Reached t = {:.6}", summary.time)),
        None,
    );

    Ok(RunResponse {
        manifest,
        summary,
        output_directory: config.control.output_directory.clone(),
        last_checkpoint,
    })
}
