//! Shared helpers for grocery list integration tests.

#![allow(dead_code)]

use grocery_list::storage::InMemoryStorage;
use grocery_list::{GroceryOperationHandler, OperationOutcome};
use serde_json::{Value, json};

/// A handler over a fresh in-memory store, plus a handle on that store.
pub fn handler_with_store() -> (GroceryOperationHandler<InMemoryStorage>, InMemoryStorage) {
    let store = InMemoryStorage::new();
    (GroceryOperationHandler::new(store.clone()), store)
}

pub fn add_request(item_name: &str) -> Value {
    json!({ "itemName": item_name })
}

/// Body of a successful outcome; panics with the error text otherwise.
pub fn success_body(outcome: OperationOutcome) -> Value {
    match outcome {
        OperationOutcome::Success(body) => body,
        OperationOutcome::Failure { message } => panic!("expected success, got error: {message}"),
    }
}

/// Error text of a failed outcome; panics otherwise.
pub fn failure_message(outcome: OperationOutcome) -> String {
    match outcome {
        OperationOutcome::Failure { message } => message,
        OperationOutcome::Success(body) => panic!("expected failure, got success: {body}"),
    }
}

/// Create an item and return its assigned id.
pub async fn create_item(
    handler: &GroceryOperationHandler<InMemoryStorage>,
    item_name: &str,
) -> String {
    let body = success_body(handler.create(add_request(item_name)).await);
    body["data"]["id"]
        .as_str()
        .expect("created item carries an id")
        .to_string()
}
