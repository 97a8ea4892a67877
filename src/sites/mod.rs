//! Site and selector list providers.
//!
//! This module provides:
//! - `SiteList`, the memoized universe of domains with an explicit reset hook
//! - Selector list loading
//! - Canonical domain normalization applied at the list boundary

mod list;
mod normalize;
mod selectors;

// Re-export public API
pub use list::{load_sites, SiteList, SiteSources};
pub use normalize::{dedup_preserving_order, normalize_domain};
pub use selectors::load_selectors;
