//! Grocery list service.
//!
//! A small JSON/HTTP CRUD service over one resource, a grocery item, persisted in a
//! pluggable document store.
//!
//! # Core Components
//!
//! - [`GroceryOperationHandler`] - list, create, update-purchase-status and delete
//! - [`Schema`] - validation and defaults applied before a document is stored
//! - [`StorageProvider`] - trait for document store backends
//! - [`server`] - axum routes and CORS policy
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use grocery_list::{GroceryOperationHandler, ServerConfig, server, storage};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let store = storage::connect(&config.database_url).await?;
//! let handler = Arc::new(GroceryOperationHandler::new(store));
//! server::serve(&config, handler).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod operation_handler;
pub mod resource;
pub mod schema;
pub mod server;
pub mod storage;

pub use config::{ConfigError, ServerConfig};
pub use error::{GroceryError, GroceryResult, ValidationError};
pub use operation_handler::{GroceryOperation, GroceryOperationHandler, OperationOutcome};
pub use resource::Item;
pub use schema::Schema;
pub use storage::{InMemoryStorage, StorageError, StorageProvider, StoreConnection};
