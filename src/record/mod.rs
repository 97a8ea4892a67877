//! DKIM key records and TXT answer parsing.
//!
//! This module provides:
//! - The `DkimRecord` produced by a successful probe
//! - The `ScanOutcome` describing what one (domain, selector) probe yielded
//! - A pure parser turning raw TXT answer text into a `ScanOutcome`

mod parse;
mod types;

// Re-export public API
pub use parse::{flatten_txt_answer, parse_record};
pub use types::{DkimRecord, ScanOutcome};
