//! Document store abstraction for grocery items.
//!
//! The `StorageProvider` trait defines protocol-agnostic document operations over
//! JSON values. Storage owns identifier assignment and per-document atomicity; it
//! knows nothing about the item schema or HTTP.
//!
//! # Architecture
//!
//! The storage layer is responsible for:
//! - Assigning a unique [`DocumentId`] to each inserted document
//! - Single-document reads, atomic merges and removals
//! - Ordering documents by identifier
//!
//! The storage layer is NOT responsible for:
//! - Default values or required attributes (see [`crate::schema`])
//! - Mapping outcomes to HTTP responses
//!
//! # Example Usage
//!
//! ```rust
//! use grocery_list::storage::{InMemoryStorage, SortOrder, StorageKey, StorageProvider};
//! use serde_json::{json, Map};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = InMemoryStorage::new();
//!
//! let stored = storage
//!     .insert("groceryitems", json!({"itemName": "milk", "isPurchased": false}))
//!     .await?;
//! let id = stored["id"].as_str().unwrap();
//!
//! let key = StorageKey::parse("groceryitems", id)?;
//! let mut changes = Map::new();
//! changes.insert("isPurchased".to_string(), json!(true));
//! let updated = storage.find_by_id_and_update(key.clone(), changes).await?;
//! assert_eq!(updated.unwrap()["isPurchased"], json!(true));
//!
//! let all = storage.find_all("groceryitems", SortOrder::Descending).await?;
//! assert_eq!(all.len(), 1);
//!
//! let removed = storage.find_by_id_and_delete(key).await?;
//! assert!(removed.is_some());
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod document_id;
pub mod errors;
pub mod in_memory;

pub use connection::{StoreConnection, connect};
pub use document_id::{DocumentId, DocumentIdGenerator};
pub use errors::StorageError;
pub use in_memory::{InMemoryStorage, InMemoryStorageStats};

use serde_json::{Map, Value};
use std::fmt;
use std::future::Future;

/// Name of the field holding the store-assigned identifier.
pub const ID_FIELD: &str = "id";

/// Identifies one document: collection name plus identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey {
    collection: String,
    id: DocumentId,
}

impl StorageKey {
    /// Create a new storage key.
    pub fn new(collection: impl Into<String>, id: DocumentId) -> Self {
        Self {
            collection: collection.into(),
            id,
        }
    }

    /// Create a key from the textual identifier sent by a client.
    pub fn parse(collection: impl Into<String>, id: &str) -> Result<Self, StorageError> {
        Ok(Self::new(collection, DocumentId::parse(id)?))
    }

    /// Get the collection name.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Get the document identifier.
    pub fn id(&self) -> DocumentId {
        self.id
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// Ordering applied by [`StorageProvider::find_all`], keyed on the identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Core trait for document stores.
///
/// Every operation touches at most one document atomically. Nothing here spans
/// documents, and there are no transactions.
pub trait StorageProvider: Send + Sync {
    /// The error type returned by storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Insert a new document and return it as stored.
    ///
    /// The store assigns a fresh identifier under [`ID_FIELD`], replacing any value
    /// the caller put there. `document` must be a JSON object.
    fn insert(
        &self,
        collection: &str,
        document: Value,
    ) -> impl Future<Output = Result<Value, Self::Error>> + Send;

    /// Every document of a collection, ordered by identifier.
    ///
    /// An unknown collection yields an empty vector.
    fn find_all(
        &self,
        collection: &str,
        order: SortOrder,
    ) -> impl Future<Output = Result<Vec<Value>, Self::Error>> + Send;

    /// Retrieve a document by key.
    fn find_by_id(
        &self,
        key: StorageKey,
    ) -> impl Future<Output = Result<Option<Value>, Self::Error>> + Send;

    /// Merge `changes` into the matching document and return the post-update state.
    ///
    /// Returns `None` when no document matches; that is not an error. The
    /// identifier field cannot be changed.
    fn find_by_id_and_update(
        &self,
        key: StorageKey,
        changes: Map<String, Value>,
    ) -> impl Future<Output = Result<Option<Value>, Self::Error>> + Send;

    /// Remove the matching document, returning it, or `None` when nothing matched.
    fn find_by_id_and_delete(
        &self,
        key: StorageKey,
    ) -> impl Future<Output = Result<Option<Value>, Self::Error>> + Send;

    /// Count the documents in a collection.
    fn count(&self, collection: &str) -> impl Future<Output = Result<usize, Self::Error>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_display() {
        let key = StorageKey::parse("groceryitems", "65a1b2c3d4e5f60718293a4b").unwrap();
        assert_eq!(key.collection(), "groceryitems");
        assert_eq!(key.id().to_string(), "65a1b2c3d4e5f60718293a4b");
        assert_eq!(key.to_string(), "groceryitems/65a1b2c3d4e5f60718293a4b");
    }

    #[test]
    fn test_storage_key_rejects_malformed_id() {
        let error = StorageKey::parse("groceryitems", "not-an-id").unwrap_err();
        assert!(error.is_invalid_input());
    }
}
