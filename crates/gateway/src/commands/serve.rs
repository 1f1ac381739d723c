//! Serve command - Starts the HTTP server.

use std::str::FromStr;

use common::{AppError, AppResult};
use user_service_lib::RepositoryKind;

use crate::cli::args::ServeArgs;
use crate::config::GatewayConfig;

/// Execute the serve command
pub async fn execute(args: ServeArgs, mut config: GatewayConfig) -> AppResult<()> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    let kind = match args.backend {
        Some(name) => RepositoryKind::from_str(&name)?,
        None => config.repository_kind()?,
    };

    tracing::info!(backend = %kind, "Starting server...");
    let repository = user_service_lib::connect_repository(kind, &config.database).await?;

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    crate::serve(listener, repository).await
}
