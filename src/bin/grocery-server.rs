//! # Grocery Server
//!
//! Runs the grocery list HTTP service.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=memory://groceries RUST_LOG=info cargo run --bin grocery-server
//! ```
//!
//! `PORT` (default `5000`) and `CORS_ORIGIN` (default `http://localhost:3000`) are
//! optional. A missing `DATABASE_URL` stops startup. A store that cannot be
//! reached does not: the server starts anyway and every request answers `400`
//! until it is restarted with a working store.

use grocery_list::{GroceryOperationHandler, ServerConfig, StoreConnection, server, storage};
use log::{error, info};
use std::sync::Arc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env().map_err(|e| {
        error!("Startup aborted: {e}");
        e
    })?;

    info!("Connecting to document store...");
    let store = match storage::connect(&config.database_url).await {
        Ok(store) => store,
        Err(e) => {
            error!("Document store connection failed: {e}");
            StoreConnection::disconnected(e.to_string())
        }
    };

    let handler = Arc::new(GroceryOperationHandler::new(store));
    server::serve(&config, handler).await?;

    Ok(())
}
