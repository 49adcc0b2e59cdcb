use serde::{Deserialize, Serialize};

/// Simulation time and step count, advanced only by the driver.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunClock {
    pub time: f64,
    pub iteration: u64,
}

impl RunClock {
    pub fn new(start_time: f64) -> Self {
        Self {
            time: start_time,
            iteration: 0,
        }
    }

    pub fn is_terminal(&self, final_time: f64) -> bool {
        self.time >= final_time
    }

    /// Step size that does not overshoot `final_time`, and whether it was
    /// shortened to land there.
    pub fn clamp_step(&self, dt: f64, final_time: f64) -> (f64, bool) {
        let remaining = final_time - self.time;
        if dt >= remaining {
            (remaining, true)
        } else {
            (dt, false)
        }
    }

    /// Advance by `dt`, snapping onto `final_time` for a truncated step.
    pub fn tick(&mut self, dt: f64, final_time: f64, truncated: bool) {
        self.time = if truncated { final_time } else { self.time + dt };
        self.iteration += 1;
    }
}
