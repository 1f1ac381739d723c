//! Integration tests for API endpoints.
//!
//! Status mapping is pinned against a mocked repository; the full user
//! lifecycle runs against every backend over an in-memory store.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{AppError, StoreResultExt};
use domain::User;
use gateway_lib::routes::create_router;
use gateway_lib::state::AppState;
use user_service_lib::infra::Database;
use user_service_lib::repository::MockUserRepository;
use user_service_lib::{build_repository, RepositoryKind, UserRepository};

// =============================================================================
// Helpers
// =============================================================================

fn sample_user(id: i64) -> User {
    let now = Utc::now();
    User {
        id,
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        created_at: now,
        updated_at: now,
    }
}

fn app_with(mock: MockUserRepository) -> Router {
    create_router(AppState::new(Arc::new(mock)))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    (status, value)
}

fn store_failure(operation: &'static str) -> AppError {
    Err::<(), _>(sqlx::Error::PoolTimedOut)
        .store_context(operation)
        .unwrap_err()
}

// =============================================================================
// Status mapping (mocked repository)
// =============================================================================

#[tokio::test]
async fn test_get_user_returns_200_with_wire_fields() {
    let mut mock = MockUserRepository::new();
    mock.expect_get_by_id()
        .withf(|id| *id == 7)
        .returning(|id| Ok(sample_user(id)));

    let (status, body) = send(&app_with(mock), Method::GET, "/users/7", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 7);
    assert_eq!(body["name"], "Alice");
    assert_eq!(body["email"], "alice@example.com");
    assert!(body["created_at"].is_string());
    assert!(body["updated_at"].is_string());
}

#[tokio::test]
async fn test_get_missing_user_returns_404() {
    let mut mock = MockUserRepository::new();
    mock.expect_get_by_id().returning(|_| Err(AppError::NotFound));

    let (status, body) = send(&app_with(mock), Method::GET, "/users/99", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_non_numeric_id_returns_400_without_touching_store() {
    // No expectations: any repository call would panic
    let app = app_with(MockUserRepository::new());

    for method in [Method::GET, Method::DELETE] {
        let (status, body) = send(&app, method, "/users/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
        assert_eq!(body["error"]["message"], "Invalid user ID");
    }
}

#[tokio::test]
async fn test_store_failure_returns_500_and_hides_details() {
    let mut mock = MockUserRepository::new();
    mock.expect_get_all().returning(|| Err(store_failure("get_all")));

    let (status, body) = send(&app_with(mock), Method::GET, "/users", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "DATABASE_ERROR");
    assert_eq!(body["error"]["message"], "A database error occurred");
}

#[tokio::test]
async fn test_closed_repository_returns_500() {
    let mut mock = MockUserRepository::new();
    mock.expect_get_all()
        .returning(|| Err(AppError::state("get_all called on closed standard repository")));

    let (status, body) = send(&app_with(mock), Method::GET, "/users", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "STATE_ERROR");
}

#[tokio::test]
async fn test_create_user_returns_201() {
    let mut mock = MockUserRepository::new();
    mock.expect_create()
        .withf(|name, email| name == "Alice" && email == "alice@example.com")
        .times(1)
        .returning(|_, _| Ok(sample_user(1)));

    let payload = json!({ "name": "Alice", "email": "alice@example.com" });
    let (status, body) = send(&app_with(mock), Method::POST, "/users", Some(payload)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
}

#[tokio::test]
async fn test_create_user_rejects_invalid_payloads() {
    let app = app_with(MockUserRepository::new());

    let cases = [
        json!({ "name": "", "email": "alice@example.com" }),
        json!({ "name": "Alice", "email": "not-an-email" }),
        json!({ "name": "x".repeat(101), "email": "alice@example.com" }),
        json!({ "name": "Alice" }),
    ];
    for payload in cases {
        let (status, body) = send(&app, Method::POST, "/users", Some(payload.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload: {}", payload);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_create_user_rejects_malformed_json() {
    let app = app_with(MockUserRepository::new());
    let request = Request::builder()
        .method(Method::POST)
        .uri("/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_email_on_create_returns_500() {
    let mut mock = MockUserRepository::new();
    mock.expect_create()
        .returning(|_, _| Err(store_failure("create")));

    let payload = json!({ "name": "Alice", "email": "alice@example.com" });
    let (status, _) = send(&app_with(mock), Method::POST, "/users", Some(payload)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_update_user_reads_back_record() {
    let mut mock = MockUserRepository::new();
    mock.expect_update()
        .withf(|id, name, email| *id == 1 && name == "Alicia" && email == "alice@example.com")
        .times(1)
        .returning(|_, _, _| Ok(()));
    mock.expect_get_by_id().times(1).returning(|id| {
        let mut user = sample_user(id);
        user.name = "Alicia".to_string();
        Ok(user)
    });

    let payload = json!({ "name": "Alicia", "email": "alice@example.com" });
    let (status, body) = send(&app_with(mock), Method::PUT, "/users/1", Some(payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Alicia");
}

#[tokio::test]
async fn test_update_missing_user_returns_404() {
    let mut mock = MockUserRepository::new();
    mock.expect_update().returning(|_, _, _| Ok(()));
    mock.expect_get_by_id().returning(|_| Err(AppError::NotFound));

    let payload = json!({ "name": "Ghost", "email": "ghost@example.com" });
    let (status, _) = send(&app_with(mock), Method::PUT, "/users/42", Some(payload)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_user_returns_204() {
    let mut mock = MockUserRepository::new();
    mock.expect_delete()
        .withf(|id| *id == 3)
        .times(1)
        .returning(|_| Ok(()));

    let (status, body) = send(&app_with(mock), Method::DELETE, "/users/3", None).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_health_reflects_repository_state() {
    let mut open = MockUserRepository::new();
    open.expect_is_open().return_const(true);
    open.expect_kind().return_const(RepositoryKind::Sqlx);

    let (status, body) = send(&app_with(open), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["backend"], "sqlx");

    let mut closed = MockUserRepository::new();
    closed.expect_is_open().return_const(false);
    closed.expect_kind().return_const(RepositoryKind::Sqlx);

    let (status, _) = send(&app_with(closed), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_banner_and_ping() {
    let mut mock = MockUserRepository::new();
    mock.expect_kind().return_const(RepositoryKind::QueryBuilder);
    let app = app_with(mock);

    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_str().unwrap().contains("query-builder"));

    let (status, body) = send(&app, Method::GET, "/ping", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("pong\n".to_string()));
}

#[tokio::test]
async fn test_openapi_document_lists_user_paths() {
    let app = app_with(MockUserRepository::new());

    let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/users"].is_object());
    assert!(body["paths"]["/users/{id}"].is_object());

    let user = &body["components"]["schemas"]["User"];
    assert_eq!(user["properties"]["name"]["example"], "Alice");
    assert_eq!(user["properties"]["email"]["example"], "alice@example.com");
}

// =============================================================================
// End to end (in-memory store)
// =============================================================================

#[tokio::test]
async fn test_user_lifecycle_over_every_backend() {
    for kind in RepositoryKind::ALL {
        let db = Database::in_memory().await.unwrap();
        let repository: Arc<dyn UserRepository> = build_repository(kind, db.into_pool());
        let app = create_router(AppState::new(repository.clone()));

        let (status, created) = send(
            &app,
            Method::POST,
            "/users",
            Some(json!({ "name": "Alice", "email": "a@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", kind);
        assert_eq!(created["id"], 1, "{}", kind);
        assert_eq!(created["created_at"], created["updated_at"], "{}", kind);

        let (status, _) = send(
            &app,
            Method::POST,
            "/users",
            Some(json!({ "name": "Copycat", "email": "a@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{}", kind);

        let (status, updated) = send(
            &app,
            Method::PUT,
            "/users/1",
            Some(json!({ "name": "Alicia", "email": "a@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{}", kind);
        assert_eq!(updated["name"], "Alicia", "{}", kind);
        assert_eq!(updated["created_at"], created["created_at"], "{}", kind);
        assert_ne!(updated["updated_at"], created["updated_at"], "{}", kind);

        let (status, list) = send(&app, Method::GET, "/users", None).await;
        assert_eq!(status, StatusCode::OK, "{}", kind);
        assert_eq!(list.as_array().map(Vec::len), Some(1), "{}", kind);

        let (status, _) = send(&app, Method::DELETE, "/users/1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT, "{}", kind);
        let (status, _) = send(&app, Method::GET, "/users/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", kind);
        let (status, _) = send(&app, Method::DELETE, "/users/1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT, "{}", kind);

        repository.close().await.unwrap();
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE, "{}", kind);
        assert_eq!(body["backend"], kind.as_str());
        let (status, body) = send(&app, Method::GET, "/users", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{}", kind);
        assert_eq!(body["error"]["code"], "STATE_ERROR", "{}", kind);
    }
}
