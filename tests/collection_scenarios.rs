//! End-to-end collection scenarios against a scripted resolver and a real
//! SQLite database.

mod helpers;

use std::time::{Duration, Instant};

use dkim_collector::scope::FullScanReason;
use dkim_collector::{
    Collector, CollectorSettings, MockResolver, ProbeFailure, ProbeFailureKind, RescanPolicy,
    ResultSink, ScopeSource, SiteList,
};
use helpers::{create_test_sink, strings, write_site_sources};
use tempfile::TempDir;

fn settings(timeout: Duration) -> CollectorSettings {
    CollectorSettings {
        chunk_size: 10,
        probe_timeout: timeout,
        persist_malformed: true,
        rescan: RescanPolicy::default(),
    }
}

#[tokio::test]
async fn test_first_scan_falls_back_to_full_list() {
    let dir = TempDir::new().unwrap();
    let sources = write_site_sources(dir.path(), &["x.com", "y.com"], None);
    let (sink, _) = create_test_sink(dir.path()).await;

    let resolver = MockResolver::new();
    resolver
        .add_txt("default._domainkey.x.com", "v=DKIM1; k=rsa; p=MIIBIjANBg")
        .add_hang("default._domainkey.y.com");

    let mut collector = Collector::new(
        resolver,
        sink.clone(),
        SiteList::new(sources),
        settings(Duration::from_millis(100)),
    );
    let start = Instant::now();
    let report = collector.collect(&strings(&["default"])).await;

    assert!(start.elapsed() < Duration::from_secs(10));
    let selector = &report.selectors[0];
    assert_eq!(
        selector.scope,
        ScopeSource::Full(FullScanReason::NoPriorKnowledge)
    );
    assert_eq!(selector.domains, 2);
    assert_eq!(selector.windows, 1);
    assert_eq!(selector.found, 1);
    assert_eq!(selector.persisted, 1);
    assert_eq!(selector.failures.get(&ProbeFailureKind::Timeout), Some(&1));

    let stored = sink.records_for_domain("x.com").await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].selector, "default");
    assert_eq!(stored[0].record_type, "DKIM1");
    assert_eq!(stored[0].key_type, "rsa");
    assert_eq!(stored[0].public_key, "MIIBIjANBg");
    assert!(sink.records_for_domain("y.com").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_second_pass_only_reverifies_known_domains() {
    let dir = TempDir::new().unwrap();
    let universe: Vec<String> = (0..30).map(|i| format!("site{i}.com")).collect();
    let universe_refs: Vec<&str> = universe.iter().map(String::as_str).collect();
    let sources = write_site_sources(dir.path(), &universe_refs, None);
    let (sink, _) = create_test_sink(dir.path()).await;

    let resolver = MockResolver::new();
    resolver
        .add_txt("google._domainkey.site3.com", "\"v=DKIM1; k=rsa; p=AAA\" \"BBB\"")
        .add_txt("google._domainkey.site17.com", "v=DKIM1; k=rsa; p=CCC");

    let mut collector = Collector::new(
        resolver.clone(),
        sink.clone(),
        SiteList::new(sources),
        settings(Duration::from_secs(1)),
    );

    let first = collector.collect(&strings(&["google"])).await;
    assert_eq!(first.selectors[0].windows, 3);
    assert_eq!(first.total_found(), 2);
    assert_eq!(resolver.queried().len(), 30);

    let second = collector.collect(&strings(&["google"])).await;
    assert_eq!(second.selectors[0].scope, ScopeSource::Known);
    assert_eq!(second.selectors[0].domains, 2);
    assert_eq!(second.total_found(), 2);
    assert_eq!(resolver.queried().len(), 32);

    // Re-verification upserts; no duplicates appear
    assert_eq!(sink.record_count().await.unwrap(), 2);
    assert_eq!(
        sink.domains_for_selector("google").await.unwrap(),
        vec!["site3.com", "site17.com"]
    );
    assert_eq!(
        sink.records_for_domain("site3.com").await.unwrap()[0].public_key,
        "AAABBB"
    );
}

#[tokio::test]
async fn test_rescan_all_probes_full_list_again() {
    let dir = TempDir::new().unwrap();
    let sources = write_site_sources(dir.path(), &["a.com", "b.com"], Some(&["c.com"]));
    let (sink, _) = create_test_sink(dir.path()).await;

    let resolver = MockResolver::new();
    resolver.add_txt("s._domainkey.a.com", "v=DKIM1; k=rsa; p=A");
    let mut collector = Collector::new(
        resolver.clone(),
        sink.clone(),
        SiteList::new(sources),
        settings(Duration::from_secs(1)),
    );
    collector.collect(&strings(&["s"])).await;
    assert_eq!(resolver.queried().len(), 3);

    let mut rescan_settings = settings(Duration::from_secs(1));
    rescan_settings.rescan = RescanPolicy::from_list(&strings(&["all"]));
    let mut rescan = Collector::new(
        resolver.clone(),
        sink,
        SiteList::new(write_site_sources(dir.path(), &["a.com", "b.com"], Some(&["c.com"]))),
        rescan_settings,
    );
    let report = rescan.collect(&strings(&["s"])).await;

    assert_eq!(
        report.selectors[0].scope,
        ScopeSource::Full(FullScanReason::Forced)
    );
    assert_eq!(resolver.queried().len(), 6);
}

#[tokio::test]
async fn test_site_list_is_loaded_once_and_resettable() {
    let dir = TempDir::new().unwrap();
    let sources = write_site_sources(dir.path(), &["a.com"], None);
    let (sink, _) = create_test_sink(dir.path()).await;

    let resolver = MockResolver::new();
    let mut collector = Collector::new(
        resolver.clone(),
        sink,
        SiteList::new(sources.clone()),
        settings(Duration::from_secs(1)),
    );

    collector.collect(&strings(&["s1"])).await;
    assert!(collector.sites_mut().is_loaded());

    // Changes on disk are ignored until the cache is reset
    write_site_sources(dir.path(), &["a.com", "b.com"], None);
    collector.collect(&strings(&["s2"])).await;
    assert_eq!(resolver.queried().len(), 2);

    collector.sites_mut().reset();
    collector.collect(&strings(&["s3"])).await;
    assert_eq!(resolver.queried().len(), 4);
}

#[tokio::test]
async fn test_probe_failures_are_counted_by_kind() {
    let dir = TempDir::new().unwrap();
    let sources = write_site_sources(dir.path(), &["nx.com", "empty.com", "err.com"], None);
    let (sink, _) = create_test_sink(dir.path()).await;

    let resolver = MockResolver::new();
    resolver
        .add_failure("s._domainkey.empty.com", ProbeFailure::NoRecords)
        .add_failure(
            "s._domainkey.err.com",
            ProbeFailure::Transport("network unreachable".into()),
        );

    let mut collector = Collector::new(
        resolver,
        sink,
        SiteList::new(sources),
        settings(Duration::from_secs(1)),
    );
    let report = collector.collect(&strings(&["s"])).await;

    let failures = &report.selectors[0].failures;
    assert_eq!(failures.get(&ProbeFailureKind::NxDomain), Some(&1));
    assert_eq!(failures.get(&ProbeFailureKind::NoRecords), Some(&1));
    assert_eq!(failures.get(&ProbeFailureKind::Transport), Some(&1));
    assert_eq!(report.total_probe_failures(), 3);
    assert_eq!(report.total_found(), 0);
}

#[tokio::test]
async fn test_missing_site_list_skips_every_new_selector() {
    let dir = TempDir::new().unwrap();
    let (sink, _) = create_test_sink(dir.path()).await;
    let sources = dkim_collector::SiteSources {
        top_sites: dir.path().join("missing.csv"),
        additional: dir.path().join("missing.txt"),
        header_rows: 0,
    };

    let resolver = MockResolver::new();
    let mut collector = Collector::new(
        resolver.clone(),
        sink,
        SiteList::new(sources),
        settings(Duration::from_secs(1)),
    );
    let report = collector.collect(&strings(&["s1", "s2"])).await;

    assert!(report.selectors.is_empty());
    assert_eq!(report.skipped.len(), 2);
    assert!(report.skipped[1].1.contains("unavailable"));
    assert!(resolver.queried().is_empty());
}
