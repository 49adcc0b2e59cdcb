use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use kn_app::{AppResult, RunOptions, RunOutcome, RunProgressEvent, RunResponse, RunStage};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kn-cli")]
#[command(about = "Radial relativistic hydrodynamics for kilonova and jet-in-star setups", long_about = None)]
struct Cli {
    /// Log filter, e.g. `info` or `kn_sim=debug`; overrides RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a configuration file
    Validate {
        /// Path to the YAML or JSON configuration
        config_path: PathBuf,
    },
    /// Start a run from a configuration file
    Run {
        /// Path to the YAML or JSON configuration
        config_path: PathBuf,
        /// Write checkpoints here instead of control.output_directory
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Stop at this time instead of control.final_time
        #[arg(long)]
        final_time: Option<f64>,
    },
    /// Continue a run from a checkpoint file
    Resume {
        /// Path to a chkpt.NNNN.json file
        checkpoint_path: PathBuf,
        /// Stop at this time instead of the checkpoint's final time
        #[arg(long)]
        final_time: Option<f64>,
        /// Write checkpoints here instead of the checkpoint's output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a summary of a checkpoint file
    ShowCheckpoint {
        /// Path to a chkpt.NNNN.json file
        checkpoint_path: PathBuf,
    },
}

fn init_tracing(log_level: Option<&str>) {
    let filter = match log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match cli.command {
        Commands::Validate { config_path } => cmd_validate(&config_path),
        Commands::Run {
            config_path,
            output,
            final_time,
        } => cmd_run(
            &config_path,
            RunOptions {
                final_time,
                output_directory: output,
                stop: None,
            },
        ),
        Commands::Resume {
            checkpoint_path,
            final_time,
            output,
        } => cmd_resume(
            &checkpoint_path,
            RunOptions {
                final_time,
                output_directory: output,
                stop: None,
            },
        ),
        Commands::ShowCheckpoint { checkpoint_path } => cmd_show_checkpoint(&checkpoint_path),
    }
}

fn cmd_validate(config_path: &Path) -> AppResult<()> {
    println!("Validating configuration: {}", config_path.display());
    let config = kn_app::load_configuration(config_path)?;
    kn_app::validate_configuration(&config)?;
    let summary = kn_app::summarize(&config);
    println!("✓ Configuration is valid");
    println!("  Model: {}", summary.model);
    println!(
        "  Domain: {:.3e} - {:.3e} cm ({} polar zones, blocks of {})",
        summary.inner_radius, summary.outer_radius, summary.num_polar_zones, summary.block_size
    );
    println!(
        "  Final time: {} s, checkpoint every {} s",
        summary.final_time, summary.checkpoint_interval
    );
    Ok(())
}

fn cmd_run(config_path: &Path, options: RunOptions) -> AppResult<()> {
    let config = kn_app::load_configuration(config_path)?;
    println!("Running {} from {}", config.model.name(), config_path.display());

    let mut reporter = ProgressReporter::default();
    let response = kn_app::run_configuration_with_progress(
        &config,
        &options,
        Some(&mut |event| reporter.report(&event)),
    )?;
    clear_progress_line();
    print_response(&response);
    Ok(())
}

fn cmd_resume(checkpoint_path: &Path, options: RunOptions) -> AppResult<()> {
    println!("Resuming from {}", checkpoint_path.display());

    let mut reporter = ProgressReporter::default();
    let response = kn_app::resume_from_checkpoint_with_progress(
        checkpoint_path,
        &options,
        Some(&mut |event| reporter.report(&event)),
    )?;
    clear_progress_line();
    print_response(&response);
    Ok(())
}

fn cmd_show_checkpoint(checkpoint_path: &Path) -> AppResult<()> {
    let checkpoint = kn_results::load_checkpoint(checkpoint_path)?;
    let state = &checkpoint.state;
    let tasks = &checkpoint.tasks;

    println!("Checkpoint: {}", checkpoint_path.display());
    println!("  Model: {}", checkpoint.configuration.model.name());
    println!("  Time: {:.6} s", state.clock.time);
    println!("  Iteration: {}", state.clock.iteration);
    println!(
        "  Boundaries: {:.6e} - {:.6e} cm",
        state.boundaries.inner.radius, state.boundaries.outer.radius
    );
    println!("  Blocks: {}  Zones: {}", state.blocks.len(), state.num_zones());
    if let Some(dt) = state.fixed_time_step {
        println!("  Fixed time step: {:.3e} s", dt);
    }
    println!("\nMass ledger (g):");
    println!("  Current: {:.6e}", state.total_mass());
    println!("  Expected: {:.6e}", state.ledger.expected());
    println!("  Boundary outflow: {:.6e}", state.ledger.boundary_outflow);
    println!("  Excised: {:.6e}", state.ledger.excised);
    println!("  Injected: {:.6e}", state.ledger.injected);
    println!("  Floored: {:.6e}", state.ledger.floored);
    println!(
        "  Relative error: {:.3e}",
        state.ledger.relative_error(state.total_mass())
    );
    println!("\nTasks:");
    println!(
        "  write_checkpoint: count={} next={:.6}",
        tasks.write_checkpoint.count, tasks.write_checkpoint.next_time
    );
    println!(
        "  write_products: count={} next={:.6}",
        tasks.write_products.count, tasks.write_products.next_time
    );
    println!("  iteration_message: count={}", tasks.iteration_message.count);
    Ok(())
}

fn print_response(response: &RunResponse) {
    let summary = &response.summary;
    match summary.outcome {
        RunOutcome::Completed => println!("✓ Run completed at t = {:.6} s", summary.time),
        RunOutcome::Stopped => println!("Run stopped at t = {:.6} s", summary.time),
    }
    println!("  Config digest: {}", response.manifest.config_digest);
    println!("  Output: {}", response.output_directory.display());
    println!("  Iterations: {}", summary.iterations);
    println!(
        "  Checkpoints: {} written, {} failed",
        summary.checkpoints_written, summary.checkpoint_failures
    );
    println!(
        "  Products: {} written, {} failed",
        summary.products_written, summary.products_failures
    );
    if let Some(path) = &response.last_checkpoint {
        println!("  Last checkpoint: {}", path.display());
    }
    println!("  Wall time: {:.2} s", summary.wall_seconds);
}

/// Throttles progress output to one redraw per 100 ms, plus every stage
/// change.
struct ProgressReporter {
    last_emit: Instant,
    last_stage: Option<RunStage>,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self {
            last_emit: Instant::now(),
            last_stage: None,
        }
    }
}

impl ProgressReporter {
    fn report(&mut self, event: &RunProgressEvent) {
        let stage_changed = self.last_stage != Some(event.stage);
        if stage_changed || self.last_emit.elapsed().as_millis() >= 100 {
            render_cli_progress(event);
            self.last_stage = Some(event.stage);
            self.last_emit = Instant::now();
        }
    }
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(120));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    match (&event.stage, &event.progress) {
        (RunStage::Running, Some(p)) => {
            let width = 28usize;
            let filled = ((p.fraction_complete * width as f64).round() as usize).min(width);
            let bar = format!(
                "{}{}",
                "#".repeat(filled),
                "-".repeat(width.saturating_sub(filled))
            );
            print!(
                "\r[{}] {:>6.2}%  t={:.4}/{:.4}s  iter={}  blocks={}  Mzps={:.2}  elapsed={:.1}s",
                bar,
                p.fraction_complete * 100.0,
                p.sim_time,
                p.final_time,
                p.iteration,
                p.num_blocks,
                p.mzps,
                event.elapsed_wall_s
            );
        }
        _ => {
            let spinner = ['|', '/', '-', '\\'];
            let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
            let mut line = format!(
                "\r{} {}  elapsed={:.2}s",
                spinner[spin_idx],
                event.stage.label(),
                event.elapsed_wall_s
            );
            if let Some(msg) = &event.message {
                line.push_str("  ");
                line.push_str(msg);
            }
            print!("{}", line);
        }
    }
    let _ = io::stdout().flush();
}
