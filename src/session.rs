use crate::util::{percentage, smooth};
use std::time::Duration;

/// Weight kept by the previous speed average on each update
pub const SPEED_SMOOTHING: f64 = 0.5;

/// Running score for one practice session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionTally {
    pub correct: usize,
    pub wrong: usize,
    /// Smoothed seconds per key, `None` until the first trial
    pub averaged_speed: Option<f64>,
}

impl SessionTally {
    pub fn record(&mut self, passed: bool, elapsed: Duration, keys: usize) {
        if passed {
            self.correct += 1;
        } else {
            self.wrong += 1;
        }

        if keys > 0 {
            let raw = elapsed.as_secs_f64() / keys as f64;
            self.averaged_speed = Some(smooth(self.averaged_speed, raw, SPEED_SMOOTHING));
        }
    }

    pub fn trials(&self) -> usize {
        self.correct + self.wrong
    }

    /// Share of wrong trials, in percent
    pub fn word_error_rate(&self) -> Option<f64> {
        percentage(self.wrong, self.trials())
    }
}
