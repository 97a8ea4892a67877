//! dkim_collector library: DKIM selector discovery
//!
//! This library probes `<selector>._domainkey.<domain>` TXT records across a
//! list of domains, parses the published DKIM keys and stores them in a SQLite
//! database. Selectors already seen on some domains are only re-verified on
//! those domains; new selectors (or explicit rescans) are probed against the
//! full site list, one bounded window of concurrent lookups at a time.
//!
//! # Example
//!
//! ```no_run
//! use dkim_collector::{run_collection, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     selectors: vec!["google".to_string(), "default".to_string()],
//!     chunk_size: 20,
//!     ..Default::default()
//! };
//!
//! let report = run_collection(config).await?;
//! println!("Found {} records", report.total_found());
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime.

#![warn(missing_docs)]

mod app;
pub mod batch;
pub mod collect;
pub mod config;
pub mod dns;
pub mod error_handling;
pub mod initialization;
pub mod record;
pub mod scope;
pub mod sites;
pub mod storage;

// Re-export public API
pub use batch::BatchRunner;
pub use collect::{CollectionReport, Collector, CollectorSettings, ScopeSource, SelectorReport};
pub use config::{Config, LogFormat, LogLevel};
pub use dns::{MockResolver, TxtResolver};
pub use error_handling::{ProbeFailure, ProbeFailureKind};
pub use record::{parse_record, DkimRecord, ScanOutcome};
pub use run::{query_domains, query_selectors, run_collection};
pub use scope::{select_scope, RescanPolicy};
pub use sites::{load_selectors, SiteList, SiteSources};
pub use storage::{MemorySink, ResultSink, SqliteSink};

// Internal run module (wires configuration to the collector)
mod run {
    use std::path::Path;

    use anyhow::{Context, Result};
    use log::info;

    use crate::app::print_collection_statistics;
    use crate::collect::{CollectionReport, Collector, CollectorSettings};
    use crate::config::Config;
    use crate::initialization::init_resolver;
    use crate::sites::{load_selectors, normalize_domain, SiteList, SiteSources};
    use crate::storage::SqliteSink;

    /// Runs a collection pass with the provided configuration.
    ///
    /// Reads the selector list, opens the database, and scans every selector
    /// in order. Individual lookups and writes that fail are logged and
    /// counted in the report; they never fail the run.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - No selector list is available
    /// - The database cannot be opened or migrated
    /// - Every selector was skipped, so no scan ran at all
    pub async fn run_collection(config: Config) -> Result<CollectionReport> {
        let selectors = load_selectors(&config.selectors, &config.selectors_file)
            .context("Failed to load selectors")?;
        info!("Selectors to scan: {}", selectors.join(", "));

        let sink = SqliteSink::connect(&config.db_path)
            .await
            .context("Failed to initialize database")?;
        let resolver = init_resolver();
        let sites = SiteList::new(SiteSources::from(&config));

        let mut collector = Collector::new(
            resolver,
            sink.clone(),
            sites,
            CollectorSettings::from(&config),
        );
        let report = collector.collect(&selectors).await;

        if let Err(e) = sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
            .execute(sink.pool())
            .await
        {
            log::warn!(
                "Failed to checkpoint WAL file (this is non-critical): {}",
                e
            );
        }

        print_collection_statistics(&report);

        if report.selectors.is_empty() && !report.skipped.is_empty() {
            let reasons: Vec<String> = report
                .skipped
                .iter()
                .map(|(selector, reason)| format!("{selector}: {reason}"))
                .collect();
            anyhow::bail!("No selector could be scanned ({})", reasons.join("; "));
        }
        Ok(report)
    }

    /// Domains known to use any of `selectors` (every known domain if empty).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or queried.
    pub async fn query_domains(db_path: &Path, selectors: &[String]) -> Result<Vec<String>> {
        let sink = SqliteSink::connect(db_path)
            .await
            .context("Failed to initialize database")?;
        let domains = sink
            .query_domains(selectors)
            .await
            .context("Failed to query domains")?;
        Ok(domains)
    }

    /// Selectors in use by any of `domains`.
    ///
    /// Domains are normalized the same way as site list entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or queried.
    pub async fn query_selectors(db_path: &Path, domains: &[String]) -> Result<Vec<String>> {
        let normalized: Vec<String> = domains.iter().filter_map(|d| normalize_domain(d)).collect();
        let sink = SqliteSink::connect(db_path)
            .await
            .context("Failed to initialize database")?;
        let selectors = sink
            .query_selectors(&normalized)
            .await
            .context("Failed to query selectors")?;
        Ok(selectors)
    }
}
