//! Configuration types.
//!
//! This module defines enums and structs used for configuration. `Config` has
//! no CLI dependencies and can be built programmatically.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

use crate::config::constants::{
    DEFAULT_ADDITIONAL_SITES_FILE, DEFAULT_CHUNK_SIZE, DEFAULT_DB_PATH, DEFAULT_PROBE_TIMEOUT_SECS,
    DEFAULT_SELECTORS_FILE, DEFAULT_SITES_FILE, TOP_SITES_HEADER_ROWS,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Collector configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use dkim_collector::Config;
///
/// let config = Config {
///     selectors: vec!["google".to_string(), "default".to_string()],
///     rescan: vec!["default".to_string()],
///     chunk_size: 20,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Database path (SQLite file)
    pub db_path: PathBuf,

    /// Top-sites CSV (`rank,domain` rows)
    pub sites_file: PathBuf,

    /// Optional supplement list, one domain per line; read only if it exists
    pub additional_sites_file: PathBuf,

    /// Leading CSV rows to skip
    pub header_rows: usize,

    /// Selectors to scan; when empty they are read from `selectors_file`
    pub selectors: Vec<String>,

    /// Selector list file, one selector per line
    pub selectors_file: PathBuf,

    /// Selectors to rescan against the full site list (`all` for every selector)
    pub rescan: Vec<String>,

    /// Domains probed concurrently per window (must be at least 1)
    pub chunk_size: usize,

    /// Upper bound on a single probe, resolver retries included
    pub probe_timeout: Duration,

    /// Persist records whose tag is not `DKIM1` (flagged as non-conformant)
    pub persist_malformed: bool,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            sites_file: PathBuf::from(DEFAULT_SITES_FILE),
            additional_sites_file: PathBuf::from(DEFAULT_ADDITIONAL_SITES_FILE),
            header_rows: TOP_SITES_HEADER_ROWS,
            selectors: Vec::new(),
            selectors_file: PathBuf::from(DEFAULT_SELECTORS_FILE),
            rescan: Vec::new(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            probe_timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
            persist_malformed: true,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}
