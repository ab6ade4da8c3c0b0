//! In-memory document store.
//!
//! Thread-safe implementation of [`StorageProvider`] backed by nested maps behind a
//! tokio `RwLock`. Suitable for development, tests and the `memory://` connection
//! scheme.
//!
//! # Performance Characteristics
//!
//! * INSERT/FIND_BY_ID/UPDATE/DELETE: O(log n) in the collection size
//! * FIND_ALL: O(n), already in identifier order
//! * COUNT: O(1)
//!
//! # Example Usage
//!
//! ```rust
//! use grocery_list::storage::{InMemoryStorage, SortOrder, StorageProvider};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = InMemoryStorage::new();
//! storage.insert("groceryitems", json!({"itemName": "eggs"})).await?;
//! storage.insert("groceryitems", json!({"itemName": "bread"})).await?;
//!
//! let newest_first = storage.find_all("groceryitems", SortOrder::Descending).await?;
//! assert_eq!(newest_first[0]["itemName"], "bread");
//! # Ok(())
//! # }
//! ```

use crate::storage::{
    DocumentId, DocumentIdGenerator, ID_FIELD, SortOrder, StorageError, StorageKey,
    StorageProvider,
};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

type Collection = BTreeMap<DocumentId, Value>;

/// Thread-safe in-memory document store.
///
/// Layout: `collection` → `id` → `document`. Cloning shares the underlying data.
#[derive(Clone)]
pub struct InMemoryStorage {
    data: Arc<RwLock<HashMap<String, Collection>>>,
    ids: Arc<DocumentIdGenerator>,
}

/// Snapshot of store contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryStorageStats {
    pub collection_count: usize,
    pub total_documents: usize,
}

impl InMemoryStorage {
    /// Create a new empty in-memory storage instance.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
            ids: Arc::new(DocumentIdGenerator::new()),
        }
    }

    /// Get storage statistics for debugging and monitoring.
    pub async fn stats(&self) -> InMemoryStorageStats {
        let data_guard = self.data.read().await;

        InMemoryStorageStats {
            collection_count: data_guard.len(),
            total_documents: data_guard.values().map(BTreeMap::len).sum(),
        }
    }

    /// Clear all data (useful for testing).
    pub async fn clear(&self) {
        let mut data_guard = self.data.write().await;
        data_guard.clear();
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageProvider for InMemoryStorage {
    type Error = StorageError;

    async fn insert(&self, collection: &str, document: Value) -> Result<Value, Self::Error> {
        let Value::Object(mut fields) = document else {
            return Err(StorageError::invalid_data("document must be a JSON object"));
        };

        let mut data_guard = self.data.write().await;

        // Generated under the write lock so identifier order matches insertion order.
        let id = self.ids.next_id();
        fields.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        let stored = Value::Object(fields);

        data_guard
            .entry(collection.to_string())
            .or_default()
            .insert(id, stored.clone());

        Ok(stored)
    }

    async fn find_all(&self, collection: &str, order: SortOrder) -> Result<Vec<Value>, Self::Error> {
        let data_guard = self.data.read().await;

        let Some(documents) = data_guard.get(collection) else {
            return Ok(Vec::new());
        };

        let results: Vec<Value> = match order {
            SortOrder::Ascending => documents.values().cloned().collect(),
            SortOrder::Descending => documents.values().rev().cloned().collect(),
        };

        Ok(results)
    }

    async fn find_by_id(&self, key: StorageKey) -> Result<Option<Value>, Self::Error> {
        let data_guard = self.data.read().await;

        let result = data_guard
            .get(key.collection())
            .and_then(|documents| documents.get(&key.id()))
            .cloned();

        Ok(result)
    }

    async fn find_by_id_and_update(
        &self,
        key: StorageKey,
        changes: Map<String, Value>,
    ) -> Result<Option<Value>, Self::Error> {
        let mut data_guard = self.data.write().await;

        let Some(document) = data_guard
            .get_mut(key.collection())
            .and_then(|documents| documents.get_mut(&key.id()))
        else {
            return Ok(None);
        };

        let Value::Object(fields) = &mut *document else {
            return Err(StorageError::internal(format!(
                "stored document {} is not an object",
                key
            )));
        };

        for (name, value) in changes {
            if name != ID_FIELD {
                fields.insert(name, value);
            }
        }

        Ok(Some(document.clone()))
    }

    async fn find_by_id_and_delete(&self, key: StorageKey) -> Result<Option<Value>, Self::Error> {
        let mut data_guard = self.data.write().await;

        let removed = data_guard
            .get_mut(key.collection())
            .and_then(|documents| documents.remove(&key.id()));

        Ok(removed)
    }

    async fn count(&self, collection: &str) -> Result<usize, Self::Error> {
        let data_guard = self.data.read().await;
        Ok(data_guard.get(collection).map_or(0, BTreeMap::len))
    }
}
