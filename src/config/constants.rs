//! Configuration constants.
//!
//! This module defines all configuration constants used throughout the application,
//! including window sizes, timeouts and default file locations.

/// Number of domains probed concurrently per window.
/// This is the only backpressure against the resolver; keep it small.
pub const DEFAULT_CHUNK_SIZE: usize = 10;

/// Per-probe timeout in seconds.
/// Covers the whole lookup including resolver retries, so a hung query cannot
/// stall its window beyond this bound.
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;

// Resolver settings
/// Timeout for a single DNS request inside the resolver, in seconds
pub const DNS_TIMEOUT_SECS: u64 = 2;
/// Number of attempts the resolver makes per query
pub const DNS_ATTEMPTS: usize = 2;

// Default locations
/// SQLite database file
pub const DEFAULT_DB_PATH: &str = "./data/dkim.db";
/// Top-sites CSV
pub const DEFAULT_SITES_FILE: &str = "./data/top-1m.csv";
/// Supplementary domains, one per line
pub const DEFAULT_ADDITIONAL_SITES_FILE: &str = "./additional_sites.txt";
/// Selectors, one per line
pub const DEFAULT_SELECTORS_FILE: &str = "./selectors.txt";

/// Leading rows of the top-sites CSV to skip before `rank,domain` rows start
pub const TOP_SITES_HEADER_ROWS: usize = 0;

/// The only `v=` tag accepted as a conformant DKIM key record
pub const EXPECTED_RECORD_TAG: &str = "DKIM1";

/// Rescan entry that forces a full scan for every selector
pub const RESCAN_ALL: &str = "all";

/// Log window progress every N windows (the last window is always logged)
pub const PROGRESS_LOG_EVERY: usize = 100;
