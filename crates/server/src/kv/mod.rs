//! Flat key-value store for domain records.
//!
//! Every domain entity is stored as a JSON record under a namespaced string
//! key (`product:{id}`, `order:{id}`, `invoice:{id}`). The store itself
//! enforces no schema; callers own the record shapes.
//!
//! # Contract
//!
//! - `get` - point lookup; absence is a valid outcome, not an error
//! - `set` - durable upsert; the write has landed when the call returns
//! - `delete` - idempotent; deleting an absent key succeeds
//! - `scan_by_prefix` - all records under a prefix, in unspecified order
//!   (callers sort when order matters)
//!
//! The backend is opaque to callers: any underlying failure surfaces as the
//! single [`StoreError::Backend`] kind. The store never retries.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by the key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Any underlying persistence failure. The platform behind the store is
    /// opaque, so callers get no finer-grained detail.
    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Backend(err.to_string())
    }
}

/// Key namespace helpers.
pub mod keys {
    /// Prefix for product records.
    pub const PRODUCT: &str = "product:";
    /// Prefix for order records.
    pub const ORDER: &str = "order:";
    /// Prefix for invoice records.
    pub const INVOICE: &str = "invoice:";

    /// Key for a product record.
    pub fn product(id: impl std::fmt::Display) -> String {
        format!("{PRODUCT}{id}")
    }

    /// Key for an order record.
    pub fn order(id: impl std::fmt::Display) -> String {
        format!("{ORDER}{id}")
    }

    /// Key for an invoice record.
    pub fn invoice(id: impl std::fmt::Display) -> String {
        format!("{INVOICE}{id}")
    }
}

/// Key-value store over one of the supported backends.
///
/// Cheaply cloneable; both backends share their underlying state across
/// clones.
#[derive(Clone)]
pub enum KvStore {
    /// `PostgreSQL` JSONB table.
    Postgres(PostgresStore),
    /// In-memory map (tests, local experiments).
    Memory(MemoryStore),
}

impl KvStore {
    /// Create a Postgres-backed store.
    #[must_use]
    pub const fn postgres(store: PostgresStore) -> Self {
        Self::Postgres(store)
    }

    /// Create an empty in-memory store.
    #[must_use]
    pub fn memory() -> Self {
        Self::Memory(MemoryStore::new())
    }

    /// Point lookup. Absence is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] on any underlying failure.
    pub async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        match self {
            Self::Postgres(store) => store.get(key).await,
            Self::Memory(store) => Ok(store.get(key).await),
        }
    }

    /// Durable upsert; overwrites any existing value at the key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] on any underlying failure.
    pub async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        match self {
            Self::Postgres(store) => store.set(key, value).await,
            Self::Memory(store) => {
                store.set(key, value).await;
                Ok(())
            }
        }
    }

    /// Remove the record. Deleting an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] on any underlying failure.
    pub async fn delete(&self, key: &str) -> Result<(), StoreError> {
        match self {
            Self::Postgres(store) => store.delete(key).await,
            Self::Memory(store) => {
                store.delete(key).await;
                Ok(())
            }
        }
    }

    /// All record values whose key starts with `prefix`, in unspecified
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] on any underlying failure.
    pub async fn scan_by_prefix(&self, prefix: &str) -> Result<Vec<Value>, StoreError> {
        match self {
            Self::Postgres(store) => store.scan_by_prefix(prefix).await,
            Self::Memory(store) => Ok(store.scan_by_prefix(prefix).await),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_set_get_roundtrip() {
        let store = KvStore::memory();
        let value = json!({"id": "p1", "name": "Scarf", "price": "15.00"});

        store.set("product:p1", value.clone()).await.unwrap();
        let fetched = store.get("product:p1").await.unwrap();
        assert_eq!(fetched, Some(value));
    }

    #[tokio::test]
    async fn test_get_absent_is_none() {
        let store = KvStore::memory();
        assert_eq!(store.get("product:nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = KvStore::memory();
        store.set("k", json!(1)).await.unwrap();
        store.set("k", json!(2)).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(json!(2)));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = KvStore::memory();
        store.set("order:o1", json!({"id": "o1"})).await.unwrap();

        store.delete("order:o1").await.unwrap();
        assert_eq!(store.get("order:o1").await.unwrap(), None);

        // deleting again (and deleting a never-existing key) must succeed
        store.delete("order:o1").await.unwrap();
        store.delete("order:never").await.unwrap();
    }

    #[tokio::test]
    async fn test_scan_by_prefix_is_complete_and_scoped() {
        let store = KvStore::memory();
        for i in 0..5 {
            store
                .set(&keys::order(format!("ORD-{i}")), json!({"n": i}))
                .await
                .unwrap();
        }
        store
            .set(&keys::product("p1"), json!({"name": "Scarf"}))
            .await
            .unwrap();
        // a key that shares a textual prefix with "order:" but is outside
        // the namespace
        store.set("orders-index", json!(true)).await.unwrap();

        let orders = store.scan_by_prefix(keys::ORDER).await.unwrap();
        assert_eq!(orders.len(), 5);

        let products = store.scan_by_prefix(keys::PRODUCT).await.unwrap();
        assert_eq!(products.len(), 1);
    }

    #[test]
    fn test_key_builders() {
        assert_eq!(keys::product("abc"), "product:abc");
        assert_eq!(keys::order("ORD-1"), "order:ORD-1");
        assert_eq!(keys::invoice("INV-1"), "invoice:INV-1");
    }
}
