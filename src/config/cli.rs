//! Command-line options.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::constants::{
    DEFAULT_ADDITIONAL_SITES_FILE, DEFAULT_CHUNK_SIZE, DEFAULT_DB_PATH, DEFAULT_PROBE_TIMEOUT_SECS,
    DEFAULT_SELECTORS_FILE, DEFAULT_SITES_FILE, TOP_SITES_HEADER_ROWS,
};
use crate::config::types::{Config, LogFormat, LogLevel};

/// Discover which domains publish DKIM keys under given selectors.
#[derive(Debug, Parser)]
#[command(name = "dkim_collector", version, about)]
pub struct Opt {
    /// SQLite database holding discovered records
    #[arg(long, global = true, default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    /// Log level
    #[arg(long, global = true, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, global = true, value_enum, default_value = "plain")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the collector (takes a while)
    Collect(CollectArgs),

    /// List domains using any of the given selectors (all known domains if none given).
    /// Example: domains google dkim default
    Domains {
        /// Selectors to look up
        selectors: Vec<String>,
    },

    /// List selectors in use by any of the given domains.
    /// Example: selectors yahoo.com intel.com
    Selectors {
        /// Domains to look up
        #[arg(required = true)]
        domains: Vec<String>,
    },
}

/// Options for `collect`.
#[derive(Debug, Args)]
pub struct CollectArgs {
    /// Use the given selectors instead of reading the selectors file
    #[arg(short, long, num_args = 1..)]
    pub selectors: Vec<String>,

    /// Selector list, one per line
    #[arg(long, default_value = DEFAULT_SELECTORS_FILE)]
    pub selectors_file: PathBuf,

    /// Rescan the given selectors (or "all") against the full site list
    #[arg(short, long, num_args = 1..)]
    pub rescan: Vec<String>,

    /// Top-sites CSV (rank,domain)
    #[arg(long, default_value = DEFAULT_SITES_FILE)]
    pub sites_file: PathBuf,

    /// Extra domains, one per line (read if present)
    #[arg(long, default_value = DEFAULT_ADDITIONAL_SITES_FILE)]
    pub additional_sites: PathBuf,

    /// Leading CSV rows to skip
    #[arg(long, default_value_t = TOP_SITES_HEADER_ROWS)]
    pub header_rows: usize,

    /// Domains probed concurrently per window
    #[arg(
        long,
        default_value_t = DEFAULT_CHUNK_SIZE,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub chunk_size: usize,

    /// Per-probe timeout in seconds
    #[arg(
        long,
        default_value_t = DEFAULT_PROBE_TIMEOUT_SECS,
        value_parser = clap::builder::RangedU64ValueParser::<u64>::new().range(1..)
    )]
    pub timeout_secs: u64,

    /// Do not persist records whose tag is not DKIM1
    #[arg(long)]
    pub skip_malformed: bool,
}

impl Opt {
    /// Builds a library `Config` from the global options and `collect` arguments.
    pub fn collect_config(&self, args: &CollectArgs) -> Config {
        Config {
            db_path: self.db_path.clone(),
            sites_file: args.sites_file.clone(),
            additional_sites_file: args.additional_sites.clone(),
            header_rows: args.header_rows,
            selectors: args.selectors.clone(),
            selectors_file: args.selectors_file.clone(),
            rescan: args.rescan.clone(),
            chunk_size: args.chunk_size,
            probe_timeout: Duration::from_secs(args.timeout_secs),
            persist_malformed: !args.skip_malformed,
            log_level: self.log_level.clone(),
            log_format: self.log_format.clone(),
        }
    }
}
