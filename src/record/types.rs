//! Record and outcome types.

use crate::config::EXPECTED_RECORD_TAG;
use crate::error_handling::ProbeFailure;

/// A DKIM public key record discovered at `<selector>._domainkey.<domain>`.
///
/// Records are only built by the parser and are not modified afterwards.
/// The selector is the one used for the query, never inferred from the answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DkimRecord {
    /// Domain the record was published under
    pub domain: String,
    /// Selector used for the lookup
    pub selector: String,
    /// Value of the `v=` tag, case preserved from the wire
    pub record_type: String,
    /// Value of the `k=` tag (e.g. `rsa`)
    pub key_type: String,
    /// Value of the `p=` tag, not validated as base64
    pub public_key: String,
}

impl DkimRecord {
    /// Returns true when the uppercased `v=` tag is `DKIM1`.
    pub fn is_conformant(&self) -> bool {
        self.record_type.to_uppercase() == EXPECTED_RECORD_TAG
    }
}

/// Result of probing one (domain, selector) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// A well-formed `v=DKIM1` record.
    Found(DkimRecord),
    /// The answer did not contain a `v=...; k=...; p=...` record.
    NotFound,
    /// The answer matched the record syntax but carried a tag other than `DKIM1`.
    ///
    /// The extracted fields are kept in `record` so callers can still persist it.
    Malformed {
        /// Raw answer text as returned by the resolver
        raw: String,
        /// The `v=` tag that was detected
        tag: String,
        /// Fields extracted from the answer
        record: DkimRecord,
    },
    /// The lookup itself failed (timeout, NXDOMAIN, transport error, ...).
    Failed(ProbeFailure),
}

impl ScanOutcome {
    /// Returns the record this outcome carries, if any.
    pub fn record(&self) -> Option<&DkimRecord> {
        match self {
            ScanOutcome::Found(record) => Some(record),
            ScanOutcome::Malformed { record, .. } => Some(record),
            ScanOutcome::NotFound | ScanOutcome::Failed(_) => None,
        }
    }

    /// Consumes the outcome and returns its record, if any.
    pub fn into_record(self) -> Option<DkimRecord> {
        match self {
            ScanOutcome::Found(record) => Some(record),
            ScanOutcome::Malformed { record, .. } => Some(record),
            ScanOutcome::NotFound | ScanOutcome::Failed(_) => None,
        }
    }

    /// Whether the outcome is worth keeping after a batch (`Found` or `Malformed`).
    pub fn is_data(&self) -> bool {
        self.record().is_some()
    }
}
