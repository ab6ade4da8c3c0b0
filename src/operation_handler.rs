//! Grocery list operation handler.
//!
//! Framework-agnostic request handling for the four grocery list operations. Each
//! operation performs one store call and every outcome, success or failure, passes
//! through a single translation step into an [`OperationOutcome`]. The HTTP layer
//! only has to copy the status and body onto the wire.
//!
//! ```rust
//! use grocery_list::operation_handler::GroceryOperationHandler;
//! use grocery_list::storage::InMemoryStorage;
//! use serde_json::json;
//!
//! # async fn example() {
//! let handler = GroceryOperationHandler::new(InMemoryStorage::new());
//!
//! let created = handler.create(json!({"itemName": "milk"})).await;
//! assert_eq!(created.status_code(), 200);
//!
//! let rejected = handler.create(json!({})).await;
//! assert_eq!(rejected.status_code(), 400);
//! # }
//! ```

use crate::error::{GroceryError, GroceryResult};
use crate::resource::Item;
use crate::schema::Schema;
use crate::storage::{ID_FIELD, SortOrder, StorageError, StorageKey, StorageProvider};
use log::{debug, error, info, warn};
use serde_json::{Map, Value, json};
use std::fmt;

/// Collection holding grocery items.
pub const ITEMS_COLLECTION: &str = "groceryitems";

/// The operations exposed by the grocery list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroceryOperation {
    /// Every item, newest identifier first
    List,
    /// Insert a new item from `itemName`
    Create,
    /// Set `isPurchased` on the item named by `id`
    UpdatePurchaseStatus,
    /// Remove the item named by `id`
    Delete,
}

impl fmt::Display for GroceryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GroceryOperation::List => "list",
            GroceryOperation::Create => "create",
            GroceryOperation::UpdatePurchaseStatus => "update-purchase-status",
            GroceryOperation::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Result of one operation, ready to be written as a response.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutcome {
    /// `200` with the given body
    Success(Value),
    /// `400` with `{"error": message}`
    Failure { message: String },
}

impl OperationOutcome {
    /// HTTP status for this outcome. Only `200` and `400` are used.
    pub fn status_code(&self) -> u16 {
        match self {
            OperationOutcome::Success(_) => 200,
            OperationOutcome::Failure { .. } => 400,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OperationOutcome::Success(_))
    }

    /// The JSON response body.
    pub fn into_body(self) -> Value {
        match self {
            OperationOutcome::Success(body) => body,
            OperationOutcome::Failure { message } => json!({ "error": message }),
        }
    }
}

/// Handles grocery list operations against an injected store.
///
/// The store handle is acquired once by the caller and shared by every request;
/// the handler keeps no other state between calls.
pub struct GroceryOperationHandler<S: StorageProvider> {
    store: S,
    schema: Schema,
    collection: String,
}

impl<S: StorageProvider> GroceryOperationHandler<S> {
    /// Create a handler storing items in [`ITEMS_COLLECTION`].
    pub fn new(store: S) -> Self {
        Self::with_collection(store, ITEMS_COLLECTION)
    }

    /// Create a handler storing items in a custom collection.
    pub fn with_collection(store: S, collection: impl Into<String>) -> Self {
        Self {
            store,
            schema: Schema::grocery_item(),
            collection: collection.into(),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The collection items are stored in.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Dispatch an operation. `body` is ignored by [`GroceryOperation::List`].
    pub async fn handle_operation(&self, operation: GroceryOperation, body: Value) -> OperationOutcome {
        let request_id = uuid::Uuid::new_v4().to_string();

        info!(
            "Grocery operation handler processing {} (request: '{}')",
            operation, request_id
        );

        let result = match operation {
            GroceryOperation::List => self.handle_list().await,
            GroceryOperation::Create => self.handle_create(body).await,
            GroceryOperation::UpdatePurchaseStatus => {
                self.handle_update_purchase_status(body, &request_id).await
            }
            GroceryOperation::Delete => self.handle_delete(body, &request_id).await,
        };

        Self::translate(operation, &request_id, result)
    }

    /// List every item, most recently created first.
    pub async fn list(&self) -> OperationOutcome {
        self.handle_operation(GroceryOperation::List, Value::Null).await
    }

    /// Create an item from `{"itemName": ...}`.
    pub async fn create(&self, body: Value) -> OperationOutcome {
        self.handle_operation(GroceryOperation::Create, body).await
    }

    /// Apply `{"id": ..., "isPurchased": ...}`.
    pub async fn update_purchase_status(&self, body: Value) -> OperationOutcome {
        self.handle_operation(GroceryOperation::UpdatePurchaseStatus, body)
            .await
    }

    /// Delete the item named by `{"id": ...}`.
    pub async fn delete(&self, body: Value) -> OperationOutcome {
        self.handle_operation(GroceryOperation::Delete, body).await
    }

    /// The one place errors become responses.
    fn translate(
        operation: GroceryOperation,
        request_id: &str,
        result: GroceryResult<Value>,
    ) -> OperationOutcome {
        match result {
            Ok(body) => {
                debug!(
                    "Grocery operation {} completed successfully (request: '{}')",
                    operation, request_id
                );
                OperationOutcome::Success(body)
            }
            Err(e) => {
                match e.storage_error() {
                    Some(storage) if storage.is_temporary() => error!(
                        "Grocery operation {} could not reach the store: {} (request: '{}')",
                        operation, e, request_id
                    ),
                    Some(storage) if storage.is_invalid_input() => info!(
                        "Grocery operation {} rejected its input: {} (request: '{}')",
                        operation, e, request_id
                    ),
                    _ => warn!(
                        "Grocery operation {} failed: {} (request: '{}')",
                        operation, e, request_id
                    ),
                }
                OperationOutcome::Failure {
                    message: e.to_string(),
                }
            }
        }
    }

    async fn handle_list(&self) -> GroceryResult<Value> {
        let documents = self
            .store
            .find_all(&self.collection, SortOrder::Descending)
            .await
            .map_err(GroceryError::provider)?;

        let items = documents
            .into_iter()
            .map(|document| Item::from_document(document)?.to_json())
            .collect::<Result<Vec<_>, StorageError>>()?;

        Ok(Value::Array(items))
    }

    async fn handle_create(&self, body: Value) -> GroceryResult<Value> {
        let request = request_object(&body)?;

        // Only the name comes from the client; the schema supplies the rest.
        let mut fields = Map::new();
        if let Some(name) = request.get("itemName") {
            fields.insert("itemName".to_string(), name.clone());
        }
        let document = self.schema.prepare_insert(&Value::Object(fields))?;

        let stored = self
            .store
            .insert(&self.collection, Value::Object(document))
            .await
            .map_err(GroceryError::provider)?;
        let item = Item::from_document(stored)?;

        Ok(json!({ "result": "success", "data": item.to_json()? }))
    }

    async fn handle_update_purchase_status(
        &self,
        body: Value,
        request_id: &str,
    ) -> GroceryResult<Value> {
        let request = request_object(&body)?;
        let key = self.target_key(request)?;
        let changes = self.schema.prepare_update(request)?;

        let updated = match key {
            Some(key) => self
                .store
                .find_by_id_and_update(key, changes)
                .await
                .map_err(GroceryError::provider)?,
            None => None,
        };

        let data = match updated {
            Some(document) => Item::from_document(document)?.to_json()?,
            None => {
                info!(
                    "Update matched no item for id {} (request: '{}')",
                    request.get(ID_FIELD).unwrap_or(&Value::Null),
                    request_id
                );
                Value::Null
            }
        };

        Ok(json!({ "result": "success", "data": data }))
    }

    async fn handle_delete(&self, body: Value, request_id: &str) -> GroceryResult<Value> {
        let request = request_object(&body)?;
        let key = self.target_key(request)?;

        let removed = match key {
            Some(key) => self
                .store
                .find_by_id_and_delete(key)
                .await
                .map_err(GroceryError::provider)?,
            None => None,
        };

        if removed.is_none() {
            info!(
                "Delete matched no item for id {} (request: '{}')",
                request.get(ID_FIELD).unwrap_or(&Value::Null),
                request_id
            );
        }

        Ok(json!({ "result": "success" }))
    }

    /// Key for the `id` in a request body. Absent or `null` matches nothing.
    fn target_key(&self, request: &Map<String, Value>) -> GroceryResult<Option<StorageKey>> {
        match request.get(ID_FIELD) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(id)) => Ok(Some(StorageKey::parse(&self.collection, id)?)),
            Some(other) => Err(StorageError::invalid_query(
                "Cast to DocumentId failed",
                other.to_string(),
            )
            .into()),
        }
    }
}

fn request_object(body: &Value) -> GroceryResult<&Map<String, Value>> {
    body.as_object()
        .ok_or_else(|| GroceryError::invalid_request("request body must be a JSON object"))
}
