//! Result sink abstraction.

use std::future::Future;

use crate::error_handling::DatabaseError;
use crate::record::DkimRecord;

/// Where collected records go, and where prior knowledge comes from.
///
/// Implementations must tolerate concurrent writers and upsert on the natural
/// key (domain, selector): writing the same record twice leaves one entry.
pub trait ResultSink: Send + Sync {
    /// Domains already known to publish a key under `selector`, oldest first.
    fn domains_for_selector(
        &self,
        selector: &str,
    ) -> impl Future<Output = Result<Vec<String>, DatabaseError>> + Send;

    /// Inserts or refreshes `record`.
    fn upsert_record(
        &self,
        record: &DkimRecord,
    ) -> impl Future<Output = Result<(), DatabaseError>> + Send;
}
