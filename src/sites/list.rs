//! Site list loading and caching.
//!
//! The universe of domains comes from a top-sites CSV (`rank,domain` rows) plus
//! an optional operator supplement file with one domain per line. It is loaded
//! at most once per `SiteList` until `reset()` is called.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};

use super::normalize::{dedup_preserving_order, normalize_domain};
use crate::config::Config;
use crate::error_handling::InputError;

/// Where the site list is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSources {
    /// Top-sites CSV, domain in the second column
    pub top_sites: PathBuf,
    /// Supplement file, read only if it exists
    pub additional: PathBuf,
    /// Leading CSV rows to skip
    pub header_rows: usize,
}

impl From<&Config> for SiteSources {
    fn from(config: &Config) -> Self {
        SiteSources {
            top_sites: config.sites_file.clone(),
            additional: config.additional_sites_file.clone(),
            header_rows: config.header_rows,
        }
    }
}

/// Memoized site list.
///
/// Owned by the collector; nothing is global. `sites()` loads on first use and
/// returns the cached list afterwards. A failed load is remembered too, so
/// later calls fail fast with `InputError::Unavailable` instead of re-reading
/// the sources. `reset()` drops both so the next call reads the sources again.
#[derive(Debug)]
pub struct SiteList {
    sources: Option<SiteSources>,
    sites: Option<Arc<[String]>>,
    failure: Option<String>,
}

impl SiteList {
    /// Creates an unloaded list backed by `sources`.
    pub fn new(sources: SiteSources) -> Self {
        SiteList {
            sources: Some(sources),
            sites: None,
            failure: None,
        }
    }

    /// Creates a list from domains already in memory (normalized and de-duplicated).
    ///
    /// A preloaded list has no sources, so after `reset()` it yields `InputError::Empty`.
    pub fn preloaded<I>(domains: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let sites = dedup_preserving_order(
            domains
                .into_iter()
                .filter_map(|d| normalize_domain(&d)),
        );
        SiteList {
            sources: None,
            sites: Some(sites.into()),
            failure: None,
        }
    }

    /// Whether the list is currently cached.
    pub fn is_loaded(&self) -> bool {
        self.sites.is_some()
    }

    /// Drops the cached list and any remembered load failure.
    pub fn reset(&mut self) {
        self.sites = None;
        self.failure = None;
    }

    /// Returns the site list, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns an `InputError` if a source cannot be read or nothing was loaded,
    /// and `InputError::Unavailable` on every call after a failed load until
    /// `reset()`.
    pub async fn sites(&mut self) -> Result<Arc<[String]>, InputError> {
        if let Some(sites) = &self.sites {
            return Ok(Arc::clone(sites));
        }
        if let Some(reason) = &self.failure {
            return Err(InputError::Unavailable(reason.clone()));
        }
        let Some(sources) = self.sources.clone() else {
            return Err(InputError::Empty("site list"));
        };

        let loaded = tokio::task::spawn_blocking(move || load_sites(&sources))
            .await
            .map_err(InputError::from)
            .and_then(|result| result);
        match loaded {
            Ok(sites) => {
                let sites: Arc<[String]> = sites.into();
                self.sites = Some(Arc::clone(&sites));
                Ok(sites)
            }
            Err(e) => {
                self.failure = Some(e.to_string());
                Err(e)
            }
        }
    }
}

/// Reads, normalizes and de-duplicates the site list from `sources`.
///
/// # Errors
///
/// Returns an `InputError` if the CSV cannot be read or parsed, if the
/// supplement exists but cannot be read, or if no domain was found.
pub fn load_sites(sources: &SiteSources) -> Result<Vec<String>, InputError> {
    let mut raw = read_top_sites(&sources.top_sites, sources.header_rows)?;
    let from_csv = raw.len();

    if sources.additional.is_file() {
        let text = std::fs::read_to_string(&sources.additional).map_err(|e| InputError::Io {
            path: sources.additional.display().to_string(),
            source: e,
        })?;
        raw.extend(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(String::from),
        );
    }
    let from_additional = raw.len() - from_csv;

    let sites = dedup_preserving_order(raw.iter().filter_map(|d| normalize_domain(d)));
    if sites.is_empty() {
        return Err(InputError::Empty("site list"));
    }

    info!(
        "Loaded {} sites ({} from {}, {} additional)",
        sites.len(),
        from_csv,
        sources.top_sites.display(),
        from_additional
    );
    Ok(sites)
}

fn read_top_sites(path: &Path, header_rows: usize) -> Result<Vec<String>, InputError> {
    let csv_error = |e: csv::Error| InputError::Csv {
        path: path.display().to_string(),
        source: e,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;

    let mut domains = Vec::new();
    let mut skipped = 0usize;
    for record in reader.records().skip(header_rows) {
        let record = record.map_err(csv_error)?;
        match record.get(1) {
            Some(domain) => domains.push(domain.to_string()),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!("Skipped {skipped} rows without a domain column in {}", path.display());
    }
    Ok(domains)
}
