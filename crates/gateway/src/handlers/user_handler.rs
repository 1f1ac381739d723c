//! User handlers.
//!
//! Each handler delegates to exactly one repository call, except PUT which
//! updates and then reads the row back.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::{AppError, AppResult};
use domain::{User, MAX_EMAIL_LENGTH, MAX_NAME_LENGTH, MIN_NAME_LENGTH};

use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// User creation request with validation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    /// Display name
    #[validate(length(
        min = MIN_NAME_LENGTH,
        max = MAX_NAME_LENGTH,
        message = "Name must be 1 to 100 characters"
    ))]
    #[schema(example = "Alice", min_length = 1, max_length = 100)]
    pub name: String,
    /// Email address, unique across users
    #[validate(
        email(message = "Invalid email format"),
        length(max = MAX_EMAIL_LENGTH, message = "Email must be at most 100 characters")
    )]
    #[schema(example = "alice@example.com", max_length = 100)]
    pub email: String,
}

/// User update request with validation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    /// New display name
    #[validate(length(
        min = MIN_NAME_LENGTH,
        max = MAX_NAME_LENGTH,
        message = "Name must be 1 to 100 characters"
    ))]
    #[schema(example = "Alicia", min_length = 1, max_length = 100)]
    pub name: String,
    /// New email address
    #[validate(
        email(message = "Invalid email format"),
        length(max = MAX_EMAIL_LENGTH, message = "Email must be at most 100 characters")
    )]
    #[schema(example = "alicia@example.com", max_length = 100)]
    pub email: String,
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

fn parse_id(raw: &str) -> AppResult<i64> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::bad_request("Invalid user ID"))
}

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users ordered by id", body = Vec<User>),
        (status = 500, description = "Store failure")
    )
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = state.repository.get_all().await?;
    Ok(Json(users))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Store failure, including duplicate email")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    let user = state
        .repository
        .create(payload.name, payload.email)
        .await?;

    tracing::info!(id = user.id, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User record", body = User),
        (status = 400, description = "Invalid user ID"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    let id = parse_id(&id)?;
    let user = state.repository.get_by_id(id).await?;
    Ok(Json(user))
}

/// Update user name and email
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Validation error or invalid user ID"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<User>> {
    let id = parse_id(&id)?;

    // A missing id is a no-op update; the read-back turns it into 404
    state
        .repository
        .update(id, payload.name, payload.email)
        .await?;
    let user = state.repository.get_by_id(id).await?;

    Ok(Json(user))
}

/// Delete user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted (or never existed)"),
        (status = 400, description = "Invalid user ID")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id)?;
    state.repository.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
