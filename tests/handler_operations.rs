//! Behaviour of the four grocery list operations against the in-memory store.

mod common;

use chrono::{DateTime, Utc};
use common::{add_request, create_item, failure_message, handler_with_store, success_body};
use grocery_list::operation_handler::ITEMS_COLLECTION;
use grocery_list::storage::StorageProvider;
use serde_json::json;

#[tokio::test]
async fn test_list_on_empty_store_is_empty_array() {
    let (handler, _) = handler_with_store();

    let outcome = handler.list().await;
    assert_eq!(outcome.status_code(), 200);
    assert_eq!(outcome.into_body(), json!([]));
}

#[tokio::test]
async fn test_create_then_list_includes_new_item() {
    let (handler, _) = handler_with_store();
    let requested_at = Utc::now();

    let body = success_body(handler.create(add_request("milk")).await);
    assert_eq!(body["result"], "success");

    let data = &body["data"];
    assert_eq!(data["itemName"], "milk");
    assert_eq!(data["isPurchased"], false);
    assert!(data["id"].is_string());

    let created_on: DateTime<Utc> = data["createdOn"].as_str().unwrap().parse().unwrap();
    assert!(created_on >= requested_at, "{created_on} is earlier than {requested_at}");

    let listed = success_body(handler.list().await);
    let items = listed.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0], *data);
}

#[tokio::test]
async fn test_created_on_never_precedes_request() {
    let (handler, _) = handler_with_store();

    for _ in 0..200 {
        let requested_at = Utc::now();
        let body = success_body(handler.create(add_request("milk")).await);

        let created_on: DateTime<Utc> = body["data"]["createdOn"].as_str().unwrap().parse().unwrap();
        assert!(created_on >= requested_at, "{created_on} is earlier than {requested_at}");
    }
}

#[tokio::test]
async fn test_create_without_item_name_persists_nothing() {
    let (handler, store) = handler_with_store();

    let message = failure_message(handler.create(json!({})).await);
    assert_eq!(
        message,
        "Validation error: Required attribute 'itemName' is missing"
    );

    let message = failure_message(handler.create(json!({"itemName": 7})).await);
    assert!(message.contains("itemName"));

    assert_eq!(store.count(ITEMS_COLLECTION).await.unwrap(), 0);
    assert_eq!(handler.list().await.into_body(), json!([]));
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let (handler, _) = handler_with_store();
    let first = create_item(&handler, "eggs").await;
    let second = create_item(&handler, "bread").await;
    let third = create_item(&handler, "butter").await;

    let listed = success_body(handler.list().await);
    let ids: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap())
        .collect();

    assert_eq!(ids, vec![third.as_str(), second.as_str(), first.as_str()]);
}

#[tokio::test]
async fn test_update_changes_only_purchase_flag() {
    let (handler, _) = handler_with_store();
    let created = success_body(handler.create(add_request("milk")).await)["data"].clone();
    let id = created["id"].as_str().unwrap();

    let body = success_body(
        handler
            .update_purchase_status(json!({
                "id": id,
                "isPurchased": true,
                "itemName": "oat milk",
                "createdOn": "2000-01-01T00:00:00.000Z"
            }))
            .await,
    );

    assert_eq!(body["result"], "success");
    let updated = &body["data"];
    assert_eq!(updated["isPurchased"], true);
    assert_eq!(updated["itemName"], created["itemName"]);
    assert_eq!(updated["createdOn"], created["createdOn"]);
    assert_eq!(updated["id"], created["id"]);

    let listed = success_body(handler.list().await);
    assert_eq!(listed[0], *updated);

    let body = success_body(
        handler
            .update_purchase_status(json!({"id": id, "isPurchased": false}))
            .await,
    );
    assert_eq!(body["data"]["isPurchased"], false);
}

#[tokio::test]
async fn test_update_unknown_id_is_success_with_null_data() {
    let (handler, _) = handler_with_store();
    create_item(&handler, "milk").await;

    let outcome = handler
        .update_purchase_status(json!({"id": "65a1b2c3d4e5f60718293a4b", "isPurchased": true}))
        .await;

    assert_eq!(outcome.status_code(), 200);
    assert_eq!(outcome.into_body(), json!({"result": "success", "data": null}));

    let listed = success_body(handler.list().await);
    assert_eq!(listed[0]["isPurchased"], false);
}

#[tokio::test]
async fn test_update_malformed_id_is_400() {
    let (handler, _) = handler_with_store();

    let message = failure_message(
        handler
            .update_purchase_status(json!({"id": "not-an-id", "isPurchased": true}))
            .await,
    );
    assert!(message.contains("Cast to DocumentId failed"), "{message}");
}

#[tokio::test]
async fn test_delete_removes_item() {
    let (handler, store) = handler_with_store();
    let keep = create_item(&handler, "eggs").await;
    let remove = create_item(&handler, "milk").await;

    let body = success_body(handler.delete(json!({"id": remove})).await);
    assert_eq!(body, json!({"result": "success"}));

    let listed = success_body(handler.list().await);
    let items = listed.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], json!(keep));
    assert_eq!(store.count(ITEMS_COLLECTION).await.unwrap(), 1);
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let (handler, _) = handler_with_store();
    let id = create_item(&handler, "milk").await;

    for _ in 0..2 {
        let body = success_body(handler.delete(json!({"id": id})).await);
        assert_eq!(body, json!({"result": "success"}));
    }

    let body = success_body(
        handler
            .delete(json!({"id": "65a1b2c3d4e5f60718293a4b"}))
            .await,
    );
    assert_eq!(body, json!({"result": "success"}));
}

#[tokio::test]
async fn test_delete_malformed_id_is_400() {
    let (handler, _) = handler_with_store();
    let outcome = handler.delete(json!({"id": "123"})).await;

    assert_eq!(outcome.status_code(), 400);
    assert!(outcome.into_body()["error"].is_string());
}

#[tokio::test]
async fn test_concurrent_creates_get_distinct_ids() {
    let (handler, _) = handler_with_store();
    let names: Vec<String> = (0..50).map(|i| format!("item-{i}")).collect();

    let outcomes =
        futures::future::join_all(names.iter().map(|name| handler.create(add_request(name)))).await;

    let mut ids: Vec<String> = outcomes
        .into_iter()
        .map(|outcome| success_body(outcome)["data"]["id"].as_str().unwrap().to_string())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 50);

    let listed = success_body(handler.list().await);
    assert_eq!(listed.as_array().unwrap().len(), 50);
}
