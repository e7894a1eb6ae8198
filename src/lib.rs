// Library surface for the binary and integration tests.
// The failure tracker is the core; the rest is the drill built around it.
pub mod app_dirs;
pub mod config;
pub mod drill;
pub mod error;
pub mod keymap;
pub mod runtime;
pub mod session;
pub mod tracker;
pub mod util;

pub use error::{DrillError, TrackerError};
pub use tracker::FailureTracker;
