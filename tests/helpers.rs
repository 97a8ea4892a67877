// Shared test helpers for site lists and databases.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::path::{Path, PathBuf};

use dkim_collector::{SiteSources, SqliteSink};

/// Writes a `rank,domain` CSV and returns sources pointing at it.
/// The supplement file is only written when `additional` is given.
#[allow(dead_code)] // Used by other test files
pub fn write_site_sources(dir: &Path, domains: &[&str], additional: Option<&[&str]>) -> SiteSources {
    let top_sites = dir.join("top-1m.csv");
    let csv: String = domains
        .iter()
        .enumerate()
        .map(|(i, d)| format!("{},{}\n", i + 1, d))
        .collect();
    std::fs::write(&top_sites, csv).expect("Failed to write top-sites CSV");

    let additional_path = dir.join("additional_sites.txt");
    if let Some(extra) = additional {
        std::fs::write(&additional_path, extra.join("\n")).expect("Failed to write supplement");
    }

    SiteSources {
        top_sites,
        additional: additional_path,
        header_rows: 0,
    }
}

/// Opens a fresh SQLite sink in `dir`.
#[allow(dead_code)] // Used by other test files
pub async fn create_test_sink(dir: &Path) -> (SqliteSink, PathBuf) {
    let db_path = dir.join("dkim.db");
    let sink = SqliteSink::connect(&db_path)
        .await
        .expect("Failed to create test database");
    (sink, db_path)
}

/// Strings from string slices.
#[allow(dead_code)] // Used by other test files
pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
