//! In-memory result sink.

use std::collections::HashSet;
use std::sync::Mutex;

use super::sink::ResultSink;
use crate::error_handling::DatabaseError;
use crate::record::DkimRecord;

/// Result sink kept in process memory.
///
/// Entries keep their first insertion position; an upsert on an existing
/// (domain, selector) replaces the entry in place. Writes for domains passed to
/// `reject_writes_for` fail, which lets callers exercise persistence failures.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<DkimRecord>>,
    rejected_domains: Mutex<HashSet<String>>,
}

impl MemorySink {
    /// An empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every write for `domain` fail.
    pub fn reject_writes_for(&self, domain: &str) {
        if let Ok(mut rejected) = self.rejected_domains.lock() {
            rejected.insert(domain.to_string());
        }
    }

    /// Snapshot of the stored records in insertion order.
    pub fn records(&self) -> Vec<DkimRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn store(&self, record: &DkimRecord) -> Result<(), DatabaseError> {
        let rejected = self
            .rejected_domains
            .lock()
            .map(|r| r.contains(&record.domain))
            .unwrap_or(false);
        if rejected {
            return Err(DatabaseError::WriteRejected(format!(
                "writes for {} are rejected",
                record.domain
            )));
        }

        let mut records = self
            .records
            .lock()
            .map_err(|_| DatabaseError::WriteRejected("record store poisoned".to_string()))?;
        match records
            .iter_mut()
            .find(|r| r.domain == record.domain && r.selector == record.selector)
        {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        Ok(())
    }
}

impl ResultSink for MemorySink {
    async fn domains_for_selector(&self, selector: &str) -> Result<Vec<String>, DatabaseError> {
        Ok(self
            .records()
            .into_iter()
            .filter(|r| r.selector == selector)
            .map(|r| r.domain)
            .collect())
    }

    async fn upsert_record(&self, record: &DkimRecord) -> Result<(), DatabaseError> {
        self.store(record)
    }
}
