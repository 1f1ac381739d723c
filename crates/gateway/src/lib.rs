//! User API Library
//!
//! HTTP layer over a [`UserRepository`](user_service_lib::UserRepository):
//! router, handlers, request validation, OpenAPI document and the CLI
//! commands that wire them to a store.

pub mod cli;
pub mod commands;
pub mod config;
pub mod extractors;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod state;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use common::{AppError, AppResult};
use user_service_lib::UserRepository;

use crate::routes::create_router;
use crate::state::AppState;

/// Serve the API on `listener` until Ctrl-C, then release the repository.
pub async fn serve(listener: TcpListener, repository: Arc<dyn UserRepository>) -> AppResult<()> {
    let app = create_router(AppState::new(repository.clone()));

    if let Ok(addr) = listener.local_addr() {
        info!("Server running on http://{}", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    info!("Server stopped, closing repository");
    repository.close().await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        // Never resolve so the server keeps running
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
