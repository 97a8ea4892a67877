//! Operator-facing output.
//!
//! This module provides progress reporting during a collection pass and the
//! statistics printed when a run finishes.

pub mod progress;
pub mod statistics;

// Re-export public API
pub use progress::{LogProgress, ProgressReporter};
pub use statistics::print_collection_statistics;
