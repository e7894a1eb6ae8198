use std::fmt::Debug;
use tracing::debug;

/// Hooks invoked by the failure tracker as its state changes.
///
/// Every method has an empty default so observers only implement what they
/// care about.
pub trait TrackerObserver<C> {
    fn failed(&self, _code: &C, _weight: u32) {}

    fn forgiven(&self, _code: &C, _weight: u32) {}

    fn removed(&self, _code: &C) {}

    fn untracked(&self, _code: &C) {}

    fn sampling_pass(&self, _pass: usize, _entries: usize) {}

    fn sampled(&self, _code: &C, _pass: usize) {}
}

/// Emits each tracker event as a `tracing` debug record
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl<C: Debug> TrackerObserver<C> for TracingObserver {
    fn failed(&self, code: &C, weight: u32) {
        debug!(?code, weight, "code failed");
    }

    fn forgiven(&self, code: &C, weight: u32) {
        debug!(?code, weight, "code forgiven once");
    }

    fn removed(&self, code: &C) {
        debug!(?code, "code removed from tracker");
    }

    fn untracked(&self, code: &C) {
        debug!(?code, "unfail on untracked code");
    }

    fn sampling_pass(&self, pass: usize, entries: usize) {
        debug!(pass, entries, "sampling pass over failed codes");
    }

    fn sampled(&self, code: &C, pass: usize) {
        debug!(?code, pass, "sampled failed code");
    }
}

/// Ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl<C> TrackerObserver<C> for SilentObserver {}
