//! DKIM TXT answer parsing.
//!
//! Answers are untrusted: they may be empty, split into several quoted
//! character-strings, carry several records, or be outright garbage. Every
//! input maps to exactly one `ScanOutcome` and parsing never fails.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{DkimRecord, ScanOutcome};

/// `v=<tag>; k=<keytype>; p=<payload>`, first occurrence anywhere in the answer.
static RECORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"v=(\w+); k=(\w+); p=(\S+)").expect("record pattern is a valid regex")
});

/// Joins split TXT character-strings and drops the remaining quotes.
///
/// `"v=DKIM1; k=rsa; p=MIIB" "IjANBg"` becomes `v=DKIM1; k=rsa; p=MIIBIjANBg`.
pub fn flatten_txt_answer(raw: &str) -> String {
    raw.replace("\" \"", "").replace('"', "")
}

/// Parses a raw TXT answer for `selector` at `domain`.
///
/// # Returns
///
/// - `ScanOutcome::NotFound` if no `v=...; k=...; p=...` sequence is present
/// - `ScanOutcome::Malformed` if the sequence is present but the tag is not `DKIM1`
/// - `ScanOutcome::Found` otherwise
pub fn parse_record(domain: &str, selector: &str, raw: &str) -> ScanOutcome {
    let flat = flatten_txt_answer(raw);
    let Some(captures) = RECORD_PATTERN.captures(&flat) else {
        return ScanOutcome::NotFound;
    };

    let record = DkimRecord {
        domain: domain.to_string(),
        selector: selector.to_string(),
        record_type: captures[1].to_string(),
        key_type: captures[2].to_string(),
        public_key: captures[3].to_string(),
    };

    if record.is_conformant() {
        ScanOutcome::Found(record)
    } else {
        ScanOutcome::Malformed {
            raw: raw.to_string(),
            tag: record.record_type.clone(),
            record,
        }
    }
}
