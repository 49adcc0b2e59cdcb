mod common;

use common::{preset_in, unique_temp_dir};
use kn_app::{RunOptions, resume_from_checkpoint, run_configuration};
use kn_results::{checkpoint_file_name, load_checkpoint};
use kn_sim::{RunOutcome, StopHandle};

fn short_run() -> RunOptions {
    RunOptions {
        final_time: Some(0.04),
        ..RunOptions::default()
    }
}

#[test]
fn resumed_kilonova_matches_uninterrupted_run() {
    let dir = unique_temp_dir("kn_app_resume");
    let config = preset_in("halo_kilonova.yaml", &dir);

    let full = run_configuration(&config, &short_run()).expect("full run");
    assert_eq!(full.summary.outcome, RunOutcome::Completed);
    assert_eq!(full.summary.checkpoints_written, 3);
    assert!(dir.join("initial_data.json").exists());

    let resumed_dir = dir.join("resumed");
    let options = RunOptions {
        output_directory: Some(resumed_dir.clone()),
        ..short_run()
    };
    let resumed =
        resume_from_checkpoint(&full.output_directory.join(checkpoint_file_name(1)), &options)
            .expect("resumed run");
    assert_eq!(resumed.summary.checkpoints_written, 1);
    assert!(!resumed_dir.join(checkpoint_file_name(1)).exists());

    let a = load_checkpoint(&full.output_directory.join(checkpoint_file_name(2))).expect("a");
    let b = load_checkpoint(&resumed_dir.join(checkpoint_file_name(2))).expect("b");
    assert_eq!(a.state, b.state);
    assert_eq!(a.tasks.write_checkpoint, b.tasks.write_checkpoint);
    assert_eq!(b.configuration.control.output_directory, resumed_dir);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn final_time_override_extends_a_finished_run() {
    let dir = unique_temp_dir("kn_app_extend");
    let config = preset_in("halo_kilonova.yaml", &dir);
    let first = run_configuration(
        &config,
        &RunOptions {
            final_time: Some(0.02),
            ..RunOptions::default()
        },
    )
    .expect("first leg");
    let last = first.last_checkpoint.expect("checkpoint written");

    let second = resume_from_checkpoint(&last, &short_run()).expect("second leg");
    assert_eq!(second.summary.time, 0.04);
    assert_eq!(second.summary.checkpoints_written, 1);
    assert!(first.output_directory.join(checkpoint_file_name(2)).exists());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn stop_request_ends_the_run_early() {
    let dir = unique_temp_dir("kn_app_stop");
    let config = preset_in("halo_kilonova.yaml", &dir);
    let stop = StopHandle::default();
    stop.request_stop();
    let response = run_configuration(
        &config,
        &RunOptions {
            stop: Some(stop),
            ..RunOptions::default()
        },
    )
    .expect("stopped run");
    assert_eq!(response.summary.outcome, RunOutcome::Stopped);
    assert_eq!(response.summary.iterations, 0);
    assert_eq!(response.summary.checkpoints_written, 1);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_configuration_is_reported() {
    let dir = unique_temp_dir("kn_app_missing");
    let err = kn_app::load_configuration(&dir.join("nope.yaml")).unwrap_err();
    assert!(matches!(err, kn_app::AppError::ConfigurationFileRead { .. }));
}
