//! Probe failure statistics.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::{ProbeFailure, ProbeFailureKind};

/// Thread-safe probe failure counter.
///
/// Every `ProbeFailureKind` is initialised to zero on creation, so concurrent
/// probes only ever touch existing atomics.
#[derive(Debug)]
pub struct ProbeStats {
    failures: HashMap<ProbeFailureKind, AtomicUsize>,
}

impl Default for ProbeStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ProbeStats {
    /// Creates a counter with every kind at zero.
    pub fn new() -> Self {
        let failures = ProbeFailureKind::iter()
            .map(|kind| (kind, AtomicUsize::new(0)))
            .collect();
        ProbeStats { failures }
    }

    /// Counts one failure.
    pub fn record(&self, failure: &ProbeFailure) {
        let kind = failure.kind();
        if let Some(counter) = self.failures.get(&kind) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to count probe failure {:?} which is not in the map. \
                 This indicates a bug in ProbeStats initialization.",
                kind
            );
        }
    }

    /// Get the count for a failure kind.
    pub fn get_count(&self, kind: ProbeFailureKind) -> usize {
        self.failures
            .get(&kind)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Total failures across all kinds.
    pub fn total(&self) -> usize {
        ProbeFailureKind::iter().map(|k| self.get_count(k)).sum()
    }

    /// Non-zero counts, ordered by kind.
    pub fn snapshot(&self) -> BTreeMap<ProbeFailureKind, usize> {
        ProbeFailureKind::iter()
            .map(|k| (k, self.get_count(k)))
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}
