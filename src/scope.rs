//! Scope selection: which domains to probe for a selector.
//!
//! A selector already seen on some domains is only re-verified on those
//! domains. A selector with no prior results, or one the operator asked to
//! rescan, is probed against the whole site list. Incremental passes therefore
//! miss new adopters outside the known set; a rescan picks them up.

use std::borrow::Cow;
use std::collections::HashSet;

use log::warn;

use crate::config::RESCAN_ALL;

/// Which selectors must be scanned against the full site list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RescanPolicy {
    all: bool,
    selectors: HashSet<String>,
}

impl RescanPolicy {
    /// Builds the policy from operator input; an `all` entry forces every selector.
    pub fn from_list(entries: &[String]) -> Self {
        RescanPolicy {
            all: entries.iter().any(|e| e == RESCAN_ALL),
            selectors: entries.iter().cloned().collect(),
        }
    }

    /// Whether `selector` must be scanned against the full site list.
    pub fn forces(&self, selector: &str) -> bool {
        self.all || self.selectors.contains(selector)
    }
}

/// Why a selector gets a full scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullScanReason {
    /// The operator asked for a rescan.
    Forced,
    /// No domain is known to use the selector yet.
    NoPriorKnowledge,
}

/// Scope decision for one selector, before the site list is consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopePlan {
    /// Re-verify exactly these domains.
    Known(Vec<String>),
    /// Probe the whole site list.
    Full(FullScanReason),
}

/// Decides the scope for `selector` from prior results.
///
/// Emits an advisory when the lack of prior results forces a full scan.
pub fn plan_scope(selector: &str, known: Vec<String>, force_full_rescan: bool) -> ScopePlan {
    if force_full_rescan {
        return ScopePlan::Full(FullScanReason::Forced);
    }
    if known.is_empty() {
        warn!("{}", full_scan_advisory(selector));
        return ScopePlan::Full(FullScanReason::NoPriorKnowledge);
    }
    ScopePlan::Known(known)
}

fn full_scan_advisory(selector: &str) -> String {
    format!("No sites found in database with selector \"{selector}\"; scanning all sites (slow)")
}

/// Returns the domains to probe for `selector` when the full list is already in hand.
///
/// The full universe is returned unchanged (borrowed) when forced or when
/// nothing is known; otherwise the known domains in their given order.
/// `Collector` calls `plan_scope` instead so the site list is only loaded
/// when a full scan is actually needed.
pub fn select_scope<'a>(
    selector: &str,
    known: Vec<String>,
    universe: &'a [String],
    force_full_rescan: bool,
) -> Cow<'a, [String]> {
    match plan_scope(selector, known, force_full_rescan) {
        ScopePlan::Known(domains) => Cow::Owned(domains),
        ScopePlan::Full(_) => Cow::Borrowed(universe),
    }
}
