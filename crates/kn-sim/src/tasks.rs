//! Recurring side effects of a run: checkpoints, data products and progress
//! messages. Their cadence is part of the run state so a resumed run picks
//! up the numbering where it left off.

use serde::{Deserialize, Serialize};

use crate::products::Products;
use crate::state::State;

/// Relative slack applied when deciding whether a task is due, so that
/// accumulated roundoff in the clock does not skip an output time.
const DUE_TOLERANCE: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecurringTask {
    /// Number of times the task has run
    pub count: usize,
    /// Simulation time at which the task is next due
    pub next_time: f64,
}

impl RecurringTask {
    pub fn new(start_time: f64) -> Self {
        Self {
            count: 0,
            next_time: start_time,
        }
    }

    pub fn is_due(&self, time: f64, interval: f64) -> bool {
        time + DUE_TOLERANCE * interval >= self.next_time
    }

    /// Mark the task done. Returns the number of the run just performed.
    pub fn advance(&mut self, interval: f64) -> usize {
        let number = self.count;
        self.count += 1;
        self.next_time += interval;
        number
    }

    /// Mark the task done at `time` and reschedule it for the first interval
    /// boundary after `time`, so a fold spanning several intervals runs the
    /// task once. Returns the number of the run just performed.
    pub fn advance_past(&mut self, time: f64, interval: f64) -> usize {
        let number = self.advance(interval);
        if interval > 0.0 {
            while self.is_due(time, interval) {
                self.next_time += interval;
            }
        }
        number
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tasks {
    pub write_checkpoint: RecurringTask,
    pub write_products: RecurringTask,
    pub iteration_message: RecurringTask,
}

impl Tasks {
    pub fn new(start_time: f64) -> Self {
        Self {
            write_checkpoint: RecurringTask::new(start_time),
            write_products: RecurringTask::new(start_time),
            iteration_message: RecurringTask::new(start_time),
        }
    }
}

/// What a driver hands to the outside world when a checkpoint is due.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub number: usize,
    pub state: &'a State,
    pub tasks: &'a Tasks,
}

/// Progress of a run, reported after every fold.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Progress {
    pub iteration: u64,
    pub time: f64,
    pub final_time: f64,
    pub dt: f64,
    pub num_blocks: usize,
    pub num_zones: usize,
    /// Zone updates per second over the last fold, in millions
    pub mzps: f64,
}

impl Progress {
    pub fn fraction_complete(&self, start_time: f64) -> f64 {
        let span = self.final_time - start_time;
        if span > 0.0 {
            ((self.time - start_time) / span).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

/// Receiver of a run's side effects.
///
/// Failures are reported back to the driver, which logs and counts them but
/// keeps running.
pub trait TaskHandler {
    type Error: std::fmt::Display;

    fn write_checkpoint(&mut self, snapshot: Snapshot<'_>) -> Result<(), Self::Error>;

    fn write_products(&mut self, number: usize, products: &Products) -> Result<(), Self::Error>;

    fn progress(&mut self, _progress: &Progress) {}
}

/// Handler that discards every side effect.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOutput;

impl TaskHandler for NoOutput {
    type Error = std::convert::Infallible;

    fn write_checkpoint(&mut self, _snapshot: Snapshot<'_>) -> Result<(), Self::Error> {
        Ok(())
    }

    fn write_products(&mut self, _number: usize, _products: &Products) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_with_roundoff_slack() {
        let mut task = RecurringTask::new(0.0);
        assert!(task.is_due(0.0, 0.1));
        assert_eq!(task.advance(0.1), 0);
        assert!(!task.is_due(0.05, 0.1));
        assert!(task.is_due(0.1 - 1e-12, 0.1));
        assert_eq!(task.advance(0.1), 1);
        assert_eq!(task.count, 2);
    }

    #[test]
    fn advancing_past_skips_missed_intervals() {
        let mut task = RecurringTask::new(0.0);
        assert_eq!(task.advance_past(0.0, 0.1), 0);
        assert!(!task.is_due(0.05, 0.1));

        assert!(task.is_due(0.35, 0.1));
        assert_eq!(task.advance_past(0.35, 0.1), 1);
        assert!(!task.is_due(0.35, 0.1));
        assert!((task.next_time - 0.4).abs() < 1e-12);
        assert_eq!(task.count, 2);
    }

    #[test]
    fn zero_interval_is_due_every_time() {
        let mut task = RecurringTask::new(0.0);
        for expected in 0..3 {
            assert!(task.is_due(1.0, 0.0));
            assert_eq!(task.advance_past(1.0, 0.0), expected);
        }
    }

    #[test]
    fn thirty_intervals_stay_due_at_the_end() {
        let mut task = RecurringTask::new(0.0);
        let mut numbers = Vec::new();
        while task.is_due(3.0, 0.1) {
            numbers.push(task.advance(0.1));
        }
        assert_eq!(numbers.len(), 31);
        assert_eq!(numbers.last(), Some(&30));
    }
}
