//! Shared test helpers for storage module tests.

use crate::record::DkimRecord;
use crate::storage::{init_memory_pool, run_migrations, SqliteSink};

/// Creates a sink over an in-memory database with migrations applied.
pub async fn create_test_sink() -> SqliteSink {
    let pool = init_memory_pool()
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    SqliteSink::from_pool(pool)
}

/// Builds a record with a key derived from the domain and selector.
pub fn test_record(domain: &str, selector: &str) -> DkimRecord {
    DkimRecord {
        domain: domain.to_string(),
        selector: selector.to_string(),
        record_type: "DKIM1".to_string(),
        key_type: "rsa".to_string(),
        public_key: format!("KEY-{selector}-{domain}"),
    }
}
