//! Database pool construction and schema setup.
//!
//! The entire persistent state is one JSONB table (see
//! [`crate::kv::PostgresStore`]). Schema setup runs via:
//! ```bash
//! cargo run -p aster-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// DDL for the key-value table. Idempotent.
pub const KV_TABLE_DDL: &str = "CREATE TABLE IF NOT EXISTS kv_store (\n\
    key   TEXT PRIMARY KEY,\n\
    value JSONB NOT NULL\n\
)";

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Create the key-value table if it does not exist.
///
/// # Errors
///
/// Returns `sqlx::Error` if the DDL fails.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(KV_TABLE_DDL).execute(pool).await?;
    Ok(())
}
