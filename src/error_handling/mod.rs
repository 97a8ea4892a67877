//! Error handling and probe statistics.
//!
//! This module provides:
//! - Error type definitions for probes, storage, site lists and initialization
//! - Thread-safe probe failure statistics
//!
//! Probe failures never abort a run. They are carried as values through every
//! layer and counted per kind so partial network failure stays visible.

mod stats;
mod types;

// Re-export public API
pub use stats::ProbeStats;
pub use types::{
    DatabaseError, InitializationError, InputError, ProbeFailure, ProbeFailureKind,
};
