use crate::storage::{DocumentId, StorageError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A grocery list entry as stored.
///
/// Serializes with the wire names `id`, `itemName`, `isPurchased` and `createdOn`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: DocumentId,
    pub item_name: String,
    pub is_purchased: bool,
    pub created_on: DateTime<Utc>,
}

impl Item {
    /// Read an item out of a stored document.
    ///
    /// Fails with [`StorageError::Serialization`] when the document does not carry
    /// every item field.
    pub fn from_document(document: Value) -> Result<Self, StorageError> {
        serde_json::from_value(document)
            .map_err(|e| StorageError::serialization(e.to_string(), "Item"))
    }

    /// The JSON form returned to clients.
    pub fn to_json(&self) -> Result<Value, StorageError> {
        serde_json::to_value(self).map_err(|e| StorageError::serialization(e.to_string(), "Item"))
    }
}
