//! SQLite-backed result sink and lookup queries.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use super::migrations::run_migrations;
use super::pool::init_db_pool_with_path;
use super::sink::ResultSink;
use crate::error_handling::DatabaseError;
use crate::record::DkimRecord;

/// Result sink storing records in the `dkim_records` table.
///
/// Upserts are keyed on (domain, selector). A refresh replaces the key
/// material and `last_seen_ms` and keeps `first_seen_ms`. Records whose tag is
/// not `DKIM1` are stored with `conformant = 0` for operator review.
#[derive(Debug, Clone)]
pub struct SqliteSink {
    pool: Arc<SqlitePool>,
}

impl SqliteSink {
    /// Opens (creating if needed) the database at `db_path` and applies migrations.
    pub async fn connect(db_path: &Path) -> Result<Self, DatabaseError> {
        let pool = init_db_pool_with_path(db_path).await?;
        run_migrations(&pool).await?;
        Ok(SqliteSink { pool })
    }

    /// Wraps an existing pool. Migrations must already be applied.
    pub fn from_pool(pool: Arc<SqlitePool>) -> Self {
        SqliteSink { pool }
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Domains using any of `selectors`, sorted; every known domain when `selectors` is empty.
    pub async fn query_domains(&self, selectors: &[String]) -> Result<Vec<String>, DatabaseError> {
        let mut query_builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT DISTINCT domain FROM dkim_records");
        if !selectors.is_empty() {
            query_builder.push(" WHERE selector IN (");
            let mut separated = query_builder.separated(", ");
            for selector in selectors {
                separated.push_bind(selector.as_str());
            }
            separated.push_unseparated(")");
        }
        query_builder.push(" ORDER BY domain");

        let rows = query_builder.build().fetch_all(self.pool.as_ref()).await?;
        Ok(rows.iter().map(|r| r.get("domain")).collect())
    }

    /// Selectors in use by any of `domains`, sorted.
    pub async fn query_selectors(&self, domains: &[String]) -> Result<Vec<String>, DatabaseError> {
        if domains.is_empty() {
            return Ok(Vec::new());
        }
        let mut query_builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT DISTINCT selector FROM dkim_records WHERE domain IN (");
        let mut separated = query_builder.separated(", ");
        for domain in domains {
            separated.push_bind(domain.as_str());
        }
        separated.push_unseparated(") ORDER BY selector");

        let rows = query_builder.build().fetch_all(self.pool.as_ref()).await?;
        Ok(rows.iter().map(|r| r.get("selector")).collect())
    }

    /// All records stored for `domain`, ordered by selector.
    ///
    /// Inspection helper for library callers and tests; the collection path
    /// and the CLI only go through `ResultSink` and the query helpers.
    pub async fn records_for_domain(&self, domain: &str) -> Result<Vec<DkimRecord>, DatabaseError> {
        let rows = sqlx::query(
            "SELECT domain, selector, record_type, key_type, public_key
             FROM dkim_records WHERE domain = ? ORDER BY selector",
        )
        .bind(domain)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .iter()
            .map(|r| DkimRecord {
                domain: r.get("domain"),
                selector: r.get("selector"),
                record_type: r.get("record_type"),
                key_type: r.get("key_type"),
                public_key: r.get("public_key"),
            })
            .collect())
    }

    /// Number of stored records.
    pub async fn record_count(&self) -> Result<i64, DatabaseError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM dkim_records")
            .fetch_one(self.pool.as_ref())
            .await?;
        Ok(count)
    }
}

impl ResultSink for SqliteSink {
    async fn domains_for_selector(&self, selector: &str) -> Result<Vec<String>, DatabaseError> {
        let domains = sqlx::query_scalar::<_, String>(
            "SELECT domain FROM dkim_records WHERE selector = ? ORDER BY id",
        )
        .bind(selector)
        .fetch_all(self.pool.as_ref())
        .await?;
        Ok(domains)
    }

    async fn upsert_record(&self, record: &DkimRecord) -> Result<(), DatabaseError> {
        let now_ms = Utc::now().timestamp_millis();
        sqlx::query(
            "INSERT INTO dkim_records (
                domain, selector, record_type, key_type, public_key,
                conformant, first_seen_ms, last_seen_ms
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(domain, selector) DO UPDATE SET
                record_type = excluded.record_type,
                key_type = excluded.key_type,
                public_key = excluded.public_key,
                conformant = excluded.conformant,
                last_seen_ms = excluded.last_seen_ms",
        )
        .bind(&record.domain)
        .bind(&record.selector)
        .bind(&record.record_type)
        .bind(&record.key_type)
        .bind(&record.public_key)
        .bind(record.is_conformant())
        .bind(now_ms)
        .bind(now_ms)
        .execute(self.pool.as_ref())
        .await?;
        Ok(())
    }
}
