//! In-memory backend for the key-value store.
//!
//! Backs unit tests and `ASTER_STORE_BACKEND=memory` local runs. Not
//! durable; everything is lost on shutdown.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

/// In-memory key-value store. Clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<BTreeMap<String, Value>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) async fn get(&self, key: &str) -> Option<Value> {
        self.records.read().await.get(key).cloned()
    }

    pub(super) async fn set(&self, key: &str, value: Value) {
        self.records.write().await.insert(key.to_owned(), value);
    }

    pub(super) async fn delete(&self, key: &str) {
        self.records.write().await.remove(key);
    }

    pub(super) async fn scan_by_prefix(&self, prefix: &str) -> Vec<Value> {
        self.records
            .read()
            .await
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(_, value)| value.clone())
            .collect()
    }
}
