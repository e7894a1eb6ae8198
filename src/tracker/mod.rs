//! Failure tracking for practice items.
//!
//! A [`FailureTracker`] remembers how often each code was gotten wrong and
//! hands back a random code biased toward the least reliable ones. Failures
//! add `repetitions` to a code's weight, successes take one away, and a code
//! leaves the tracker once its weight runs out.

pub mod observer;
pub mod sampling;

pub use observer::{SilentObserver, TracingObserver, TrackerObserver};

use crate::error::TrackerError;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

pub const DEFAULT_REPETITIONS: u32 = 3;

/// Upper bound on full passes over the tracked codes in one `sample` call
pub const DEFAULT_MAX_PASSES: usize = 10_000;

#[derive(Debug, Clone)]
pub struct FailureTracker<C, O = TracingObserver> {
    repetitions: u32,
    max_passes: usize,
    weights: HashMap<C, u32>,
    observer: O,
}

impl<C: Hash + Eq + Debug> FailureTracker<C, TracingObserver> {
    pub fn new(repetitions: u32) -> Result<Self, TrackerError> {
        Self::with_observer(repetitions, TracingObserver)
    }
}

impl<C: Hash + Eq> Default for FailureTracker<C, TracingObserver> {
    fn default() -> Self {
        Self {
            repetitions: DEFAULT_REPETITIONS,
            max_passes: DEFAULT_MAX_PASSES,
            weights: HashMap::new(),
            observer: TracingObserver,
        }
    }
}

impl<C, O> FailureTracker<C, O>
where
    C: Hash + Eq,
    O: TrackerObserver<C>,
{
    pub fn with_observer(repetitions: u32, observer: O) -> Result<Self, TrackerError> {
        if repetitions == 0 {
            return Err(TrackerError::InvalidConfiguration(
                "repetitions must be a positive integer".to_string(),
            ));
        }
        Ok(Self {
            repetitions,
            max_passes: DEFAULT_MAX_PASSES,
            weights: HashMap::new(),
            observer,
        })
    }

    /// Replace the cap on sampling passes
    pub fn with_max_passes(mut self, max_passes: usize) -> Result<Self, TrackerError> {
        if max_passes == 0 {
            return Err(TrackerError::InvalidConfiguration(
                "max_passes must be at least 1".to_string(),
            ));
        }
        self.max_passes = max_passes;
        Ok(self)
    }

    pub fn repetitions(&self) -> u32 {
        self.repetitions
    }

    pub fn max_passes(&self) -> usize {
        self.max_passes
    }

    /// Record a failure, adding `repetitions` to the code's weight
    pub fn fail(&mut self, code: C) {
        match self.weights.entry(code) {
            Entry::Occupied(mut entry) => {
                let weight = entry.get().saturating_add(self.repetitions);
                entry.insert(weight);
                self.observer.failed(entry.key(), weight);
            }
            Entry::Vacant(entry) => {
                self.observer.failed(entry.key(), self.repetitions);
                entry.insert(self.repetitions);
            }
        }
    }

    /// Record a success. A single success forgives one unit of weight; the
    /// code is dropped when its last unit goes.
    pub fn unfail(&mut self, code: &C) {
        let Some(weight) = self.weights.get_mut(code) else {
            self.observer.untracked(code);
            return;
        };
        if *weight > 1 {
            *weight -= 1;
            let weight = *weight;
            self.observer.forgiven(code, weight);
        } else {
            self.weights.remove(code);
            self.observer.removed(code);
        }
    }

    /// Current weight of `code`, 0 when untracked
    pub fn weight_of(&self, code: &C) -> u32 {
        self.weights.get(code).copied().unwrap_or(0)
    }

    pub fn contains(&self, code: &C) -> bool {
        self.weights.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn total_weight(&self) -> u64 {
        self.weights.values().map(|w| u64::from(*w)).sum()
    }

    /// All tracked codes with their weights, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&C, u32)> {
        self.weights.iter().map(|(code, weight)| (code, *weight))
    }
}
