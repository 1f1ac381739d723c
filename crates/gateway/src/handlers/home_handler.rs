//! Banner and liveness handlers.

use axum::{extract::State, routing::get, Router};

use crate::state::AppState;

/// Create banner routes
pub fn home_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/ping", get(ping))
}

/// Plain-text banner naming the active backend
pub async fn home(State(state): State<AppState>) -> String {
    format!(
        "User API ({} backend)\n\
         \n\
         GET    /ping\n\
         GET    /health\n\
         GET    /users\n\
         POST   /users\n\
         GET    /users/:id\n\
         PUT    /users/:id\n\
         DELETE /users/:id\n\
         GET    /api-docs/openapi.json\n",
        state.repository.kind()
    )
}

pub async fn ping() -> &'static str {
    "pong\n"
}
