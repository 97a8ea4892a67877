//! Collection orchestration.
//!
//! For each selector, in order: decide the scope, probe it window by window,
//! and hand every record found to the result sink. Selectors run one after the
//! other. A failing selector, probe or write is logged and skipped; the run
//! itself always completes.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{error, info, warn};

use crate::app::{LogProgress, ProgressReporter};
use crate::batch::BatchRunner;
use crate::config::Config;
use crate::dns::TxtResolver;
use crate::error_handling::{InputError, ProbeFailureKind, ProbeStats};
use crate::record::ScanOutcome;
use crate::scope::{plan_scope, FullScanReason, RescanPolicy, ScopePlan};
use crate::sites::SiteList;
use crate::storage::ResultSink;

/// Collector tuning, independent of where results go.
#[derive(Debug, Clone)]
pub struct CollectorSettings {
    /// Domains probed concurrently per window
    pub chunk_size: usize,
    /// Upper bound on a single probe
    pub probe_timeout: Duration,
    /// Persist records whose tag is not `DKIM1`
    pub persist_malformed: bool,
    /// Selectors forced onto the full site list
    pub rescan: RescanPolicy,
}

impl From<&Config> for CollectorSettings {
    fn from(config: &Config) -> Self {
        CollectorSettings {
            chunk_size: config.chunk_size,
            probe_timeout: config.probe_timeout,
            persist_malformed: config.persist_malformed,
            rescan: RescanPolicy::from_list(&config.rescan),
        }
    }
}

/// Where a selector's domain set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeSource {
    /// Domains already known to use the selector
    Known,
    /// The full site list
    Full(FullScanReason),
}

/// Outcome of one selector's pass.
#[derive(Debug, Clone)]
pub struct SelectorReport {
    /// Selector scanned
    pub selector: String,
    /// Where the probed domains came from
    pub scope: ScopeSource,
    /// Domains probed
    pub domains: usize,
    /// Windows completed
    pub windows: usize,
    /// Conformant records found
    pub found: usize,
    /// Records with a tag other than `DKIM1`
    pub malformed: usize,
    /// Records written to the sink
    pub persisted: usize,
    /// Records the sink failed to write
    pub persist_failures: usize,
    /// Non-conformant records not written because persistence was disabled
    pub skipped_malformed: usize,
    /// Probe failures by kind
    pub failures: BTreeMap<ProbeFailureKind, usize>,
    /// Wall-clock time for this selector
    pub elapsed_seconds: f64,
}

/// Results of a collection run.
#[derive(Debug, Clone, Default)]
pub struct CollectionReport {
    /// Selectors that were scanned, in order
    pub selectors: Vec<SelectorReport>,
    /// Selectors that could not be scanned, with the reason
    pub skipped: Vec<(String, String)>,
    /// Wall-clock time for the whole run
    pub elapsed_seconds: f64,
}

impl CollectionReport {
    /// Conformant records found across selectors.
    pub fn total_found(&self) -> usize {
        self.selectors.iter().map(|s| s.found).sum()
    }

    /// Non-conformant records found across selectors.
    pub fn total_malformed(&self) -> usize {
        self.selectors.iter().map(|s| s.malformed).sum()
    }

    /// Records written across selectors.
    pub fn total_persisted(&self) -> usize {
        self.selectors.iter().map(|s| s.persisted).sum()
    }

    /// Failed writes across selectors.
    pub fn total_persist_failures(&self) -> usize {
        self.selectors.iter().map(|s| s.persist_failures).sum()
    }

    /// Probe failures across selectors, all kinds.
    pub fn total_probe_failures(&self) -> usize {
        self.selectors
            .iter()
            .flat_map(|s| s.failures.values())
            .sum()
    }
}

/// Runs collection passes against a resolver and a result sink.
///
/// The collector owns the site list cache; use `sites_mut()` to reset it
/// between runs.
pub struct Collector<R, S> {
    resolver: R,
    sink: S,
    sites: SiteList,
    settings: CollectorSettings,
}

impl<R: TxtResolver, S: ResultSink> Collector<R, S> {
    /// Creates a collector.
    pub fn new(resolver: R, sink: S, sites: SiteList, settings: CollectorSettings) -> Self {
        Collector {
            resolver,
            sink,
            sites,
            settings,
        }
    }

    /// The result sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The owned site list cache.
    pub fn sites_mut(&mut self) -> &mut SiteList {
        &mut self.sites
    }

    /// Scans every selector in order.
    ///
    /// Never fails: a selector whose scope cannot be built is reported in
    /// `CollectionReport::skipped` and the next selector proceeds.
    pub async fn collect(&mut self, selectors: &[String]) -> CollectionReport {
        let start = Instant::now();
        let mut report = CollectionReport::default();

        for selector in selectors {
            match self.collect_selector(selector).await {
                Ok(selector_report) => report.selectors.push(selector_report),
                Err(e) => {
                    error!("Skipping selector \"{selector}\": {e}");
                    report.skipped.push((selector.clone(), e.to_string()));
                }
            }
        }

        report.elapsed_seconds = start.elapsed().as_secs_f64();
        report
    }

    async fn collect_selector(&mut self, selector: &str) -> Result<SelectorReport, InputError> {
        let start = Instant::now();
        let force = self.settings.rescan.forces(selector);

        let known = if force {
            Vec::new()
        } else {
            match self.sink.domains_for_selector(selector).await {
                Ok(domains) => domains,
                Err(e) => {
                    warn!("Failed to read known domains for \"{selector}\": {e}");
                    Vec::new()
                }
            }
        };

        let (domains, scope): (Arc<[String]>, ScopeSource) =
            match plan_scope(selector, known, force) {
                ScopePlan::Known(domains) => (domains.into(), ScopeSource::Known),
                ScopePlan::Full(reason) => (self.sites.sites().await?, ScopeSource::Full(reason)),
            };

        let stats = ProbeStats::new();
        let runner = BatchRunner::new(
            &self.resolver,
            self.settings.chunk_size,
            self.settings.probe_timeout,
            &stats,
        );
        let windows = runner.window_count(domains.len());
        info!(
            "Collecting DKIMs for selector \"{selector}\" ({} domains, {windows} windows)",
            domains.len()
        );

        let mut progress = LogProgress::new(selector, windows);
        let mut outcomes = runner
            .run(&domains, selector, || progress.advance(1))
            .await;

        let mut report = SelectorReport {
            selector: selector.to_string(),
            scope,
            domains: domains.len(),
            windows: progress.done(),
            found: 0,
            malformed: 0,
            persisted: 0,
            persist_failures: 0,
            skipped_malformed: 0,
            failures: BTreeMap::new(),
            elapsed_seconds: 0.0,
        };

        // Scope order keeps writes deterministic
        for domain in domains.iter() {
            let Some(outcome) = outcomes.remove(domain) else {
                continue;
            };
            let record = match outcome {
                ScanOutcome::Found(record) => {
                    report.found += 1;
                    record
                }
                ScanOutcome::Malformed { record, .. } => {
                    report.malformed += 1;
                    if !self.settings.persist_malformed {
                        report.skipped_malformed += 1;
                        continue;
                    }
                    record
                }
                ScanOutcome::NotFound | ScanOutcome::Failed(_) => continue,
            };

            match self.sink.upsert_record(&record).await {
                Ok(()) => report.persisted += 1,
                Err(e) => {
                    warn!("Failed to store DKIM record for {domain} (selector \"{selector}\"): {e}");
                    report.persist_failures += 1;
                }
            }
        }

        report.failures = stats.snapshot();
        report.elapsed_seconds = start.elapsed().as_secs_f64();
        info!(
            "Selector \"{selector}\": {} found, {} non-conformant, {} stored, {} lookup failures",
            report.found,
            report.malformed,
            report.persisted,
            stats.total()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::MockResolver;
    use crate::record::DkimRecord;
    use crate::storage::MemorySink;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn settings() -> CollectorSettings {
        CollectorSettings {
            chunk_size: 10,
            probe_timeout: Duration::from_millis(100),
            persist_malformed: true,
            rescan: RescanPolicy::default(),
        }
    }

    fn record(domain: &str, selector: &str, key: &str) -> DkimRecord {
        DkimRecord {
            domain: domain.to_string(),
            selector: selector.to_string(),
            record_type: "DKIM1".to_string(),
            key_type: "rsa".to_string(),
            public_key: key.to_string(),
        }
    }

    #[tokio::test]
    async fn test_known_domains_limit_scope() {
        let resolver = MockResolver::new();
        resolver.add_txt("google._domainkey.a.com", "v=DKIM1; k=rsa; p=NEWKEY");
        let sink = MemorySink::new();
        sink.upsert_record(&record("a.com", "google", "OLDKEY")).await.unwrap();
        let sites = SiteList::preloaded(strings(&["x.com", "y.com", "a.com"]));

        let mut collector = Collector::new(resolver.clone(), sink, sites, settings());
        let report = collector.collect(&strings(&["google"])).await;

        assert_eq!(resolver.queried(), vec!["google._domainkey.a.com"]);
        assert_eq!(report.selectors[0].scope, ScopeSource::Known);
        assert_eq!(report.selectors[0].domains, 1);
        assert_eq!(collector.sink().records()[0].public_key, "NEWKEY");
    }

    #[tokio::test]
    async fn test_rescan_ignores_known_domains() {
        let resolver = MockResolver::new();
        let sink = MemorySink::new();
        sink.upsert_record(&record("a.com", "google", "K")).await.unwrap();
        let sites = SiteList::preloaded(strings(&["x.com", "y.com"]));
        let mut settings = settings();
        settings.rescan = RescanPolicy::from_list(&strings(&["google"]));

        let mut collector = Collector::new(resolver.clone(), sink, sites, settings);
        let report = collector.collect(&strings(&["google"])).await;

        assert_eq!(
            resolver.queried(),
            vec!["google._domainkey.x.com", "google._domainkey.y.com"]
        );
        assert_eq!(
            report.selectors[0].scope,
            ScopeSource::Full(FullScanReason::Forced)
        );
    }

    #[tokio::test]
    async fn test_malformed_records_persisted_by_default() {
        let resolver = MockResolver::new();
        resolver.add_txt("s._domainkey.odd.com", "v=DKIM2; k=rsa; p=XYZ");
        let sites = SiteList::preloaded(strings(&["odd.com"]));

        let mut collector = Collector::new(resolver, MemorySink::new(), sites, settings());
        let report = collector.collect(&strings(&["s"])).await;

        assert_eq!(report.total_malformed(), 1);
        assert_eq!(report.total_persisted(), 1);
        let stored = collector.sink().records();
        assert_eq!(stored[0].record_type, "DKIM2");
    }

    #[tokio::test]
    async fn test_malformed_records_skipped_when_disabled() {
        let resolver = MockResolver::new();
        resolver.add_txt("s._domainkey.odd.com", "v=DKIM2; k=rsa; p=XYZ");
        let sites = SiteList::preloaded(strings(&["odd.com"]));
        let mut settings = settings();
        settings.persist_malformed = false;

        let mut collector = Collector::new(resolver, MemorySink::new(), sites, settings);
        let report = collector.collect(&strings(&["s"])).await;

        assert_eq!(report.selectors[0].malformed, 1);
        assert_eq!(report.selectors[0].skipped_malformed, 1);
        assert_eq!(report.total_persisted(), 0);
        assert!(collector.sink().records().is_empty());
    }

    #[tokio::test]
    async fn test_persistence_failure_does_not_abort_batch() {
        let resolver = MockResolver::new();
        resolver
            .add_txt("s._domainkey.bad.com", "v=DKIM1; k=rsa; p=A")
            .add_txt("s._domainkey.good.com", "v=DKIM1; k=rsa; p=B");
        let sink = MemorySink::new();
        sink.reject_writes_for("bad.com");
        let sites = SiteList::preloaded(strings(&["bad.com", "good.com"]));

        let mut collector = Collector::new(resolver, sink, sites, settings());
        let report = collector.collect(&strings(&["s", "t"])).await;

        assert_eq!(report.selectors.len(), 2);
        assert_eq!(report.selectors[0].found, 2);
        assert_eq!(report.selectors[0].persist_failures, 1);
        assert_eq!(report.selectors[0].persisted, 1);
        assert_eq!(collector.sink().records()[0].domain, "good.com");
    }

    #[tokio::test]
    async fn test_site_list_failure_skips_selector_only() {
        let resolver = MockResolver::new();
        resolver.add_txt("s._domainkey.a.com", "v=DKIM1; k=rsa; p=A");
        let sink = MemorySink::new();
        sink.upsert_record(&record("a.com", "s", "A")).await.unwrap();
        let mut sites = SiteList::preloaded(strings(&["a.com"]));
        sites.reset();

        let mut collector = Collector::new(resolver, sink, sites, settings());
        let report = collector.collect(&strings(&["new", "s"])).await;

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].0, "new");
        assert_eq!(report.selectors.len(), 1);
        assert_eq!(report.selectors[0].selector, "s");
        assert_eq!(report.selectors[0].found, 1);
    }

    #[tokio::test]
    async fn test_selectors_processed_in_order() {
        let resolver = MockResolver::new();
        let sites = SiteList::preloaded(strings(&["a.com"]));

        let mut collector = Collector::new(resolver.clone(), MemorySink::new(), sites, settings());
        let report = collector.collect(&strings(&["b", "a", "c"])).await;

        let order: Vec<&str> = report.selectors.iter().map(|s| s.selector.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
        assert_eq!(
            resolver.queried(),
            vec!["b._domainkey.a.com", "a._domainkey.a.com", "c._domainkey.a.com"]
        );
        assert_eq!(report.total_probe_failures(), 3);
    }
}
