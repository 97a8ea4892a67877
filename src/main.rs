//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `dkim_collector` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use dkim_collector::config::{Command, Opt};
use dkim_collector::initialization::init_logger_with;
use dkim_collector::{query_domains, query_selectors, run_collection};

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::parse();

    init_logger_with(opt.log_level.clone().into(), opt.log_format.clone())
        .context("Failed to initialize logger")?;

    let result = match &opt.command {
        Command::Collect(args) => {
            let config = opt.collect_config(args);
            let db_path = config.db_path.clone();
            run_collection(config).await.map(|report| {
                println!(
                    "Scanned {} selector{} ({} skipped): {} record{} found, {} non-conformant, {} stored in {:.1}s",
                    report.selectors.len(),
                    if report.selectors.len() == 1 { "" } else { "s" },
                    report.skipped.len(),
                    report.total_found(),
                    if report.total_found() == 1 { "" } else { "s" },
                    report.total_malformed(),
                    report.total_persisted(),
                    report.elapsed_seconds
                );
                println!("Results saved in {}", db_path.display());
            })
        }
        Command::Domains { selectors } => query_domains(&opt.db_path, selectors)
            .await
            .map(|domains| domains.iter().for_each(|d| println!("{d}"))),
        Command::Selectors { domains } => query_selectors(&opt.db_path, domains)
            .await
            .map(|selectors| selectors.iter().for_each(|s| println!("{s}"))),
    };

    if let Err(e) = result {
        eprintln!("dkim_collector error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}
