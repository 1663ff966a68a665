//! `PostgreSQL` backend for the key-value store.
//!
//! One table, no schema beyond the key:
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS kv_store (
//!     key   TEXT PRIMARY KEY,
//!     value JSONB NOT NULL
//! );
//! ```
//!
//! Queries are bound at runtime: a generic JSONB table has no compile-time
//! schema worth checking against.

use serde_json::Value;
use sqlx::PgPool;

use super::StoreError;

/// Postgres-backed key-value store.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a store over an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(super) async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let value = sqlx::query_scalar::<_, Value>("SELECT value FROM kv_store WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    pub(super) async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO kv_store (key, value) VALUES ($1, $2) \
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub(super) async fn delete(&self, key: &str) -> Result<(), StoreError> {
        // Deleting an absent key affects zero rows, which is fine.
        sqlx::query("DELETE FROM kv_store WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub(super) async fn scan_by_prefix(&self, prefix: &str) -> Result<Vec<Value>, StoreError> {
        // Prefixes are fixed namespace strings ("order:" etc.), never
        // user-supplied, so no LIKE-wildcard escaping is needed.
        let values =
            sqlx::query_scalar::<_, Value>("SELECT value FROM kv_store WHERE key LIKE $1")
                .bind(format!("{prefix}%"))
                .fetch_all(&self.pool)
                .await?;
        Ok(values)
    }
}
