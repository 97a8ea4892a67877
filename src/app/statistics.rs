//! Statistics printing.

use log::{info, warn};

use crate::collect::{CollectionReport, ScopeSource};
use crate::scope::FullScanReason;

/// Logs a per-selector breakdown and run totals.
pub fn print_collection_statistics(report: &CollectionReport) {
    for selector in &report.selectors {
        let scope = match selector.scope {
            ScopeSource::Known => "known domains",
            ScopeSource::Full(FullScanReason::Forced) => "full list (rescan)",
            ScopeSource::Full(FullScanReason::NoPriorKnowledge) => "full list (first scan)",
        };
        info!(
            "Selector \"{}\" [{}]: {} domains in {} windows, {} found, {} non-conformant, {} stored in {:.1}s",
            selector.selector,
            scope,
            selector.domains,
            selector.windows,
            selector.found,
            selector.malformed,
            selector.persisted,
            selector.elapsed_seconds
        );
        if selector.persist_failures > 0 {
            warn!("   {} records could not be stored", selector.persist_failures);
        }
        if selector.skipped_malformed > 0 {
            info!(
                "   {} non-conformant records not stored",
                selector.skipped_malformed
            );
        }
        for (kind, count) in &selector.failures {
            info!("   {}: {}", kind.as_str(), count);
        }
    }

    for (selector, reason) in &report.skipped {
        warn!("Selector \"{selector}\" skipped: {reason}");
    }

    info!(
        "Run statistics: selectors={}, skipped={}, found={}, non-conformant={}, stored={}, store_failures={}, lookup_failures={}",
        report.selectors.len(),
        report.skipped.len(),
        report.total_found(),
        report.total_malformed(),
        report.total_persisted(),
        report.total_persist_failures(),
        report.total_probe_failures()
    );
}
