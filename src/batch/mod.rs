//! Window-based batch probing.
//!
//! Domains are split into consecutive windows of `chunk_size`. Each window's
//! probes run concurrently and the whole window is joined before the next one
//! starts, so at most `chunk_size` lookups are ever in flight and a slow lookup
//! holds back the following window.

use std::collections::HashMap;
use std::time::Duration;

use futures::future::join_all;
use log::{debug, warn};

use crate::dns::{probe, TxtResolver};
use crate::error_handling::ProbeStats;
use crate::record::{parse_record, ScanOutcome};

/// Drives probes over a domain list one window at a time.
pub struct BatchRunner<'a, R> {
    resolver: &'a R,
    chunk_size: usize,
    timeout: Duration,
    stats: &'a ProbeStats,
}

impl<'a, R: TxtResolver> BatchRunner<'a, R> {
    /// Creates a runner. A `chunk_size` of zero is raised to one.
    pub fn new(resolver: &'a R, chunk_size: usize, timeout: Duration, stats: &'a ProbeStats) -> Self {
        if chunk_size == 0 {
            warn!("Window size 0 is invalid, using 1");
        }
        BatchRunner {
            resolver,
            chunk_size: chunk_size.max(1),
            timeout,
            stats,
        }
    }

    /// Number of windows needed for `domain_count` domains.
    pub fn window_count(&self, domain_count: usize) -> usize {
        domain_count.div_ceil(self.chunk_size)
    }

    /// Probes every domain for `selector` and returns the outcomes worth keeping.
    ///
    /// Only `Found` and `Malformed` outcomes are kept. Probe failures are
    /// counted in the runner's `ProbeStats`. `on_progress` is called once
    /// after each window has fully completed.
    pub async fn run<F: FnMut()>(
        &self,
        domains: &[String],
        selector: &str,
        mut on_progress: F,
    ) -> HashMap<String, ScanOutcome> {
        let mut results = HashMap::new();

        for window in domains.chunks(self.chunk_size) {
            let outcomes = join_all(
                window
                    .iter()
                    .map(|domain| self.probe_and_parse(domain, selector)),
            )
            .await;

            for (domain, outcome) in outcomes {
                match outcome {
                    ScanOutcome::Found(_) => {
                        results.insert(domain, outcome);
                    }
                    ScanOutcome::Malformed { ref tag, .. } => {
                        warn!("{domain}: unknown record type {tag:?} for selector \"{selector}\"");
                        results.insert(domain, outcome);
                    }
                    ScanOutcome::Failed(ref failure) => {
                        debug!("{selector}._domainkey.{domain}: {failure}");
                        self.stats.record(failure);
                    }
                    ScanOutcome::NotFound => {}
                }
            }

            on_progress();
        }

        results
    }

    async fn probe_and_parse(&self, domain: &str, selector: &str) -> (String, ScanOutcome) {
        let outcome = match probe(self.resolver, domain, selector, self.timeout).await {
            Ok(raw) => parse_record(domain, selector, &raw),
            Err(failure) => ScanOutcome::Failed(failure),
        };
        (domain.to_string(), outcome)
    }
}
