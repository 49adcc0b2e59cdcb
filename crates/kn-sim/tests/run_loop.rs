mod common;

use common::*;
use kn_sim::{Driver, IntegratorType, NoOutput, RunControl, RunOutcome, State};

fn control(final_time: f64) -> RunControl {
    RunControl {
        final_time,
        fold: 5,
        checkpoint_interval: 0.01,
        products_interval: Some(0.02),
    }
}

#[test]
fn checkpoints_land_on_every_interval() {
    let mut driver = jet_driver(IntegratorType::RK2);
    let mut recorder = Recorder::default();
    let summary = driver.run(&control(0.05), &mut recorder).expect("run");

    assert_eq!(summary.outcome, RunOutcome::Completed);
    assert_eq!(summary.time, 0.05);
    assert_eq!(driver.state().clock.time, 0.05);
    assert_eq!(summary.checkpoint_failures, 0);

    let numbers: Vec<usize> = recorder.checkpoints.iter().map(|c| c.0).collect();
    assert_eq!(numbers, vec![0, 1, 2, 3, 4, 5]);
    for (number, state, tasks) in &recorder.checkpoints {
        assert!(state.clock.time + 1e-9 >= *number as f64 * 0.01);
        assert_eq!(tasks.write_checkpoint.count, number + 1);
    }
    assert_eq!(summary.checkpoints_written, 6);

    let products: Vec<usize> = recorder.products.iter().map(|p| p.0).collect();
    assert_eq!(products, vec![0, 1, 2]);
    assert!(recorder.progress_events > 0);
}

#[test]
fn long_folds_write_each_state_once() {
    let mut driver = jet_driver(IntegratorType::RK2);
    let mut recorder = Recorder::default();
    let control = RunControl {
        fold: 100,
        ..control(0.1)
    };
    let summary = driver.run(&control, &mut recorder).expect("run");
    assert_eq!(summary.outcome, RunOutcome::Completed);

    // Each fold covers about five intervals.
    let numbers: Vec<usize> = recorder.checkpoints.iter().map(|c| c.0).collect();
    assert_eq!(numbers, vec![0, 1, 2]);
    let times: Vec<f64> = recorder.checkpoints.iter().map(|c| c.1.clock.time).collect();
    assert!(times.windows(2).all(|w| w[0] < w[1]), "{times:?}");
    assert_eq!(times.last(), Some(&0.1));
    for (_, state, tasks) in &recorder.checkpoints {
        assert!(tasks.write_checkpoint.next_time > state.clock.time);
    }

    let products: Vec<usize> = recorder.products.iter().map(|p| p.0).collect();
    assert_eq!(products, vec![0, 1, 2]);
}

#[test]
fn checkpoint_failures_are_counted_and_cadence_advances() {
    let mut driver = jet_driver(IntegratorType::RK1);
    let mut failing = Failing::default();
    let summary = driver.run(&control(0.03), &mut failing).expect("run continues");

    assert_eq!(summary.outcome, RunOutcome::Completed);
    assert_eq!(failing.attempts, vec![0, 1, 2, 3]);
    assert_eq!(summary.checkpoint_failures, 4);
    assert_eq!(summary.checkpoints_written, 0);
    assert_eq!(driver.tasks().write_checkpoint.count, 4);
}

#[test]
fn stop_request_ends_the_run_between_steps() {
    let mut driver = jet_driver(IntegratorType::RK2);
    driver.stop_handle().request_stop();
    let mut recorder = Recorder::default();
    let summary = driver.run(&control(1.0), &mut recorder).expect("run");

    assert_eq!(summary.outcome, RunOutcome::Stopped);
    assert_eq!(summary.iterations, 0);
    assert_eq!(recorder.checkpoints.len(), 1);
}

#[test]
fn resumed_run_matches_uninterrupted_run() {
    let mut reference = jet_driver(IntegratorType::RK2);
    let mut recorder = Recorder::default();
    reference.run(&control(0.04), &mut recorder).expect("reference run");

    let (number, saved, tasks) = recorder.checkpoints[2].clone();
    assert_eq!(number, 2);

    let text = serde_json::to_string(&saved).expect("serialize state");
    let restored: State = serde_json::from_str(&text).expect("deserialize state");
    assert_eq!(restored, saved);

    let setup = setup(scheme(IntegratorType::RK2, 0.3), jet_mesh());
    let mut resumed = Driver::resume(setup, jet(), restored, tasks).expect("resume");
    let mut later = Recorder::default();
    resumed.run(&control(0.04), &mut later).expect("resumed run");

    assert_eq!(resumed.state(), reference.state());
    let numbers: Vec<usize> = later.checkpoints.iter().map(|c| c.0).collect();
    assert_eq!(numbers, vec![3, 4]);
}

#[test]
fn run_rejects_zero_fold() {
    let mut driver = jet_driver(IntegratorType::RK1);
    let control = RunControl {
        fold: 0,
        ..control(0.01)
    };
    assert!(driver.run(&control, &mut NoOutput).is_err());
}
