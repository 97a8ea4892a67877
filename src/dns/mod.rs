//! DNS TXT resolution and probing.
//!
//! This module provides:
//! - The `TxtResolver` seam used by the collector, implemented for the
//!   `hickory-resolver` tokio resolver
//! - The prober, which issues one bounded TXT lookup per (domain, selector)
//! - `MockResolver`, a scripted resolver for tests
//!
//! Answers are rendered the way `dig +short` prints them: each record's
//! character-strings quoted and space-separated, one record per line.

mod mock;
mod probe;
mod resolver;

// Re-export public API
pub use mock::MockResolver;
pub use probe::{probe, query_name};
pub use resolver::{render_txt_answer, TxtResolver};
