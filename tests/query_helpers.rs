//! Tests for the database query helpers used by the `domains` and
//! `selectors` subcommands.

mod helpers;

use dkim_collector::{query_domains, query_selectors, DkimRecord, ResultSink};
use helpers::{create_test_sink, strings};
use tempfile::TempDir;

fn record(domain: &str, selector: &str) -> DkimRecord {
    DkimRecord {
        domain: domain.to_string(),
        selector: selector.to_string(),
        record_type: "DKIM1".to_string(),
        key_type: "rsa".to_string(),
        public_key: format!("{selector}-{domain}"),
    }
}

async fn seeded_db(dir: &TempDir) -> std::path::PathBuf {
    let (sink, db_path) = create_test_sink(dir.path()).await;
    for (domain, selector) in [
        ("b.com", "google"),
        ("a.com", "google"),
        ("a.com", "selector1"),
        ("c.com", "k1"),
    ] {
        sink.upsert_record(&record(domain, selector)).await.unwrap();
    }
    sink.pool().close().await;
    db_path
}

#[tokio::test]
async fn test_query_domains_filters_by_selector() {
    let dir = TempDir::new().unwrap();
    let db_path = seeded_db(&dir).await;

    let domains = query_domains(&db_path, &strings(&["google", "selector1"]))
        .await
        .unwrap();
    assert_eq!(domains, vec!["a.com", "b.com"]);
}

#[tokio::test]
async fn test_query_domains_without_selectors_lists_everything() {
    let dir = TempDir::new().unwrap();
    let db_path = seeded_db(&dir).await;

    let domains = query_domains(&db_path, &[]).await.unwrap();
    assert_eq!(domains, vec!["a.com", "b.com", "c.com"]);
}

#[tokio::test]
async fn test_query_selectors_normalizes_domains() {
    let dir = TempDir::new().unwrap();
    let db_path = seeded_db(&dir).await;

    let selectors = query_selectors(&db_path, &strings(&[" A.COM. "]))
        .await
        .unwrap();
    assert_eq!(selectors, vec!["google", "selector1"]);
}

#[tokio::test]
async fn test_query_selectors_for_unknown_domain_is_empty() {
    let dir = TempDir::new().unwrap();
    let db_path = seeded_db(&dir).await;

    let selectors = query_selectors(&db_path, &strings(&["nowhere.org"]))
        .await
        .unwrap();
    assert!(selectors.is_empty());
}
