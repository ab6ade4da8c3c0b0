//! Process-wide store handle.
//!
//! [`connect`] is called once at startup. When it fails the binary keeps running
//! with [`StoreConnection::Disconnected`], which fails every operation with
//! [`StorageError::Unavailable`] so each request reports the problem itself.

use crate::storage::{InMemoryStorage, SortOrder, StorageError, StorageKey, StorageProvider};
use log::info;
use serde_json::{Map, Value};

/// Connection string scheme served by [`InMemoryStorage`].
pub const MEMORY_SCHEME: &str = "memory";

/// A live or failed store connection, shared by every handler.
#[derive(Clone)]
pub enum StoreConnection {
    InMemory(InMemoryStorage),
    Disconnected { reason: String },
}

impl StoreConnection {
    /// A handle that fails every operation with `reason`.
    pub fn disconnected(reason: impl Into<String>) -> Self {
        Self::Disconnected {
            reason: reason.into(),
        }
    }

    /// Whether operations can reach a store.
    pub fn is_connected(&self) -> bool {
        !matches!(self, Self::Disconnected { .. })
    }

    fn unavailable(reason: &str) -> StorageError {
        StorageError::unavailable(format!("no store connection ({})", reason))
    }
}

/// Open a store from a connection string such as `memory://groceries`.
pub async fn connect(url: &str) -> Result<StoreConnection, StorageError> {
    let (scheme, name) = url.split_once("://").ok_or_else(|| {
        StorageError::configuration(format!("malformed connection string '{}'", url))
    })?;

    match scheme {
        MEMORY_SCHEME => {
            info!("Connected to in-memory document store '{}'", name);
            Ok(StoreConnection::InMemory(InMemoryStorage::new()))
        }
        other => Err(StorageError::configuration(format!(
            "unsupported store scheme '{}'",
            other
        ))),
    }
}

impl StorageProvider for StoreConnection {
    type Error = StorageError;

    async fn insert(&self, collection: &str, document: Value) -> Result<Value, Self::Error> {
        match self {
            Self::InMemory(storage) => storage.insert(collection, document).await,
            Self::Disconnected { reason } => Err(Self::unavailable(reason)),
        }
    }

    async fn find_all(&self, collection: &str, order: SortOrder) -> Result<Vec<Value>, Self::Error> {
        match self {
            Self::InMemory(storage) => storage.find_all(collection, order).await,
            Self::Disconnected { reason } => Err(Self::unavailable(reason)),
        }
    }

    async fn find_by_id(&self, key: StorageKey) -> Result<Option<Value>, Self::Error> {
        match self {
            Self::InMemory(storage) => storage.find_by_id(key).await,
            Self::Disconnected { reason } => Err(Self::unavailable(reason)),
        }
    }

    async fn find_by_id_and_update(
        &self,
        key: StorageKey,
        changes: Map<String, Value>,
    ) -> Result<Option<Value>, Self::Error> {
        match self {
            Self::InMemory(storage) => storage.find_by_id_and_update(key, changes).await,
            Self::Disconnected { reason } => Err(Self::unavailable(reason)),
        }
    }

    async fn find_by_id_and_delete(&self, key: StorageKey) -> Result<Option<Value>, Self::Error> {
        match self {
            Self::InMemory(storage) => storage.find_by_id_and_delete(key).await,
            Self::Disconnected { reason } => Err(Self::unavailable(reason)),
        }
    }

    async fn count(&self, collection: &str) -> Result<usize, Self::Error> {
        match self {
            Self::InMemory(storage) => storage.count(collection).await,
            Self::Disconnected { reason } => Err(Self::unavailable(reason)),
        }
    }
}
