//! Route configuration.

use axum::{response::Json, routing::get, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::handlers::{health_routes, home_routes, user_routes};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(home_routes())
        .merge(health_routes())
        .merge(user_routes())
        .route("/api-docs/openapi.json", get(openapi_document))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn openapi_document() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
