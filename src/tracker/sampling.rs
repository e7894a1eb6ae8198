//! Rank-ordered threshold sampling over failed codes.
//!
//! Codes are visited heaviest first. Each visit draws a uniform number in
//! `[0, 1)` and accepts the code when the draw falls under the current
//! threshold. The threshold starts at `low` and rises by
//! `|high - low| / (total_weight - 1)` after every rejected visit, carrying
//! over from one pass to the next, so the heaviest code gets the first shot
//! at `low` and later visits face a steadily easier bar.
//!
//! With `low == 0` the very first visit can never accept. Sampling still
//! ends as long as the threshold moves (`high != low` and more than one
//! unit of weight), otherwise the pass cap turns the call into
//! [`TrackerError::SamplingExhausted`].

use super::{FailureTracker, TrackerObserver};
use crate::error::TrackerError;
use rand::Rng;
use std::hash::Hash;

impl<C, O> FailureTracker<C, O>
where
    C: Hash + Eq + Clone,
    O: TrackerObserver<C>,
{
    /// Draw a failed code using the thread-local RNG. `Ok(None)` means
    /// nothing is tracked.
    pub fn sample(&self, low: f64, high: f64) -> Result<Option<C>, TrackerError> {
        self.sample_with(&mut rand::thread_rng(), low, high)
    }

    pub fn sample_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        low: f64,
        high: f64,
    ) -> Result<Option<C>, TrackerError> {
        if self.weights.is_empty() {
            return Ok(None);
        }

        let mut ranked: Vec<(&C, u32)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        let total = self.total_weight();
        let interval = threshold_step(low, high, total);

        let mut threshold = low;
        for pass in 0..self.max_passes {
            self.observer.sampling_pass(pass, ranked.len());
            for (code, _) in &ranked {
                if rng.gen::<f64>() < threshold {
                    self.observer.sampled(code, pass);
                    return Ok(Some((*code).clone()));
                }
                threshold += interval;
            }
        }

        Err(TrackerError::SamplingExhausted {
            passes: self.max_passes,
        })
    }
}

fn threshold_step(low: f64, high: f64, total: u64) -> f64 {
    if total > 1 {
        (high - low).abs() / (total - 1) as f64
    } else {
        0.0
    }
}
