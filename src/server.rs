//! HTTP surface for the grocery list.
//!
//! Binds each method+path under [`RESOURCE_PREFIX`] to one operation of
//! [`GroceryOperationHandler`] and copies the resulting [`OperationOutcome`] onto
//! the response. Request bodies that are not valid JSON never reach the handler;
//! they are answered with the same `400 {"error": ...}` shape. Unknown paths and
//! unsupported methods answer `404` and `405` with a JSON error body as well.
//!
//! | Method | Path                    | Operation                |
//! |--------|-------------------------|--------------------------|
//! | GET    | `/getAll`               | list                     |
//! | POST   | `/add`                  | create                   |
//! | PUT    | `/updatePurchaseStatus` | update purchase status   |
//! | DELETE | `/deleteGroceryItem`    | delete                   |

use crate::config::ServerConfig;
use crate::operation_handler::{GroceryOperation, GroceryOperationHandler, OperationOutcome};
use crate::storage::StorageProvider;
use axum::{
    Json, Router,
    extract::{OriginalUri, State, rejection::JsonRejection},
    http::{HeaderValue, Method, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use log::{error, info};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;

/// Path prefix shared by every grocery list route.
pub const RESOURCE_PREFIX: &str = "/api/groceryList";

type SharedHandler<S> = Arc<GroceryOperationHandler<S>>;

/// Errors raised while building or running the HTTP server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid CORS origin '{origin}'")]
    InvalidOrigin { origin: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Routes without any middleware.
pub fn router<S>(handler: SharedHandler<S>) -> Router
where
    S: StorageProvider + 'static,
{
    let routes = Router::new()
        .route("/getAll", get(get_all::<S>))
        .route("/add", post(add::<S>))
        .route("/updatePurchaseStatus", put(update_purchase_status::<S>))
        .route("/deleteGroceryItem", delete(delete_grocery_item::<S>))
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(handler);

    Router::new()
        .nest(RESOURCE_PREFIX, routes)
        .fallback(not_found)
}

/// Cross-origin policy admitting exactly one origin.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, ServerError> {
    let origin_header =
        HeaderValue::from_str(origin).map_err(|_| ServerError::InvalidOrigin {
            origin: origin.to_string(),
        })?;

    Ok(CorsLayer::new()
        .allow_origin(origin_header)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60)))
}

/// Routes wrapped in the CORS policy.
pub fn app<S>(handler: SharedHandler<S>, cors_origin: &str) -> Result<Router, ServerError>
where
    S: StorageProvider + 'static,
{
    Ok(router(handler).layer(cors_layer(cors_origin)?))
}

/// Bind, serve until Ctrl+C or SIGTERM, then drain.
pub async fn serve<S>(config: &ServerConfig, handler: SharedHandler<S>) -> Result<(), ServerError>
where
    S: StorageProvider + 'static,
{
    let app = app(handler, &config.cors_origin)?;

    let address = config.bind_address();
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}, routes under {RESOURCE_PREFIX}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn get_all<S>(State(handler): State<SharedHandler<S>>) -> Response
where
    S: StorageProvider + 'static,
{
    respond(handler.list().await)
}

async fn add<S>(
    State(handler): State<SharedHandler<S>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response
where
    S: StorageProvider + 'static,
{
    dispatch(&handler, GroceryOperation::Create, payload).await
}

async fn update_purchase_status<S>(
    State(handler): State<SharedHandler<S>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response
where
    S: StorageProvider + 'static,
{
    dispatch(&handler, GroceryOperation::UpdatePurchaseStatus, payload).await
}

async fn delete_grocery_item<S>(
    State(handler): State<SharedHandler<S>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response
where
    S: StorageProvider + 'static,
{
    dispatch(&handler, GroceryOperation::Delete, payload).await
}

async fn dispatch<S>(
    handler: &GroceryOperationHandler<S>,
    operation: GroceryOperation,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response
where
    S: StorageProvider + 'static,
{
    match payload {
        Ok(Json(body)) => respond(handler.handle_operation(operation, body).await),
        Err(rejection) => {
            info!("Rejected {} request body: {}", operation, rejection.body_text());
            respond(OperationOutcome::Failure {
                message: rejection.body_text(),
            })
        }
    }
}

async fn not_found(OriginalUri(uri): OriginalUri) -> Response {
    json_error(StatusCode::NOT_FOUND, format!("No route for {}", uri.path()))
}

async fn method_not_allowed(method: Method, OriginalUri(uri): OriginalUri) -> Response {
    json_error(
        StatusCode::METHOD_NOT_ALLOWED,
        format!("Method {} is not allowed for {}", method, uri.path()),
    )
}

fn json_error(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn respond(outcome: OperationOutcome) -> Response {
    let status = StatusCode::from_u16(outcome.status_code()).unwrap_or(StatusCode::BAD_REQUEST);
    (status, Json(outcome.into_body())).into_response()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install terminate handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
