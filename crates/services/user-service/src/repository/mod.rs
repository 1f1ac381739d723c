//! Repository layer for data access.
//!
//! [`UserRepository`] is the contract every backend satisfies identically.
//! Four backends share one SQLite pool and differ only in how they issue SQL
//! and marshal rows; [`build_repository`] picks one from a [`RepositoryKind`].

pub mod entities;
mod handle;
mod kind;
mod orm;
mod query_builder;
mod sqlx_store;
mod standard;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;

use common::AppResult;
use domain::User;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

pub use kind::RepositoryKind;
pub use orm::OrmUserStore;
pub use query_builder::QueryBuilderUserStore;
pub use sqlx_store::SqlxUserStore;
pub use standard::StandardUserStore;

/// User repository trait for dependency injection.
///
/// Every method is a single request against the store. Failures from the
/// store come back as `AppError::Store` tagged with the method name; calls
/// made after [`close`](UserRepository::close) fail with `AppError::State`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Backend implementing this repository
    fn kind(&self) -> RepositoryKind;

    /// Whether the store connection is still held
    fn is_open(&self) -> bool;

    /// List all users ordered by ascending id (empty store yields an empty list)
    async fn get_all(&self) -> AppResult<Vec<User>>;

    /// Find user by id, `AppError::NotFound` when absent
    async fn get_by_id(&self, id: i64) -> AppResult<User>;

    /// Insert a user and read it back with its store-assigned id and timestamps.
    ///
    /// The insert and the read-back are two separate requests. When the
    /// read-back fails the error is returned even though the row was written.
    async fn create(&self, name: String, email: String) -> AppResult<User>;

    /// Overwrite name and email and refresh `updated_at`.
    ///
    /// An id matching no row is a silent no-op.
    async fn update(&self, id: i64, name: String, email: String) -> AppResult<()>;

    /// Hard delete by id. An id matching no row is a silent no-op.
    async fn delete(&self, id: i64) -> AppResult<()>;

    /// Release the store connection. A second call fails with `AppError::State`.
    async fn close(&self) -> AppResult<()>;
}

/// Build the repository backend selected by `kind` over an open pool.
pub fn build_repository(kind: RepositoryKind, pool: SqlitePool) -> Arc<dyn UserRepository> {
    tracing::debug!(backend = %kind, "Building user repository");

    match kind {
        RepositoryKind::Standard => Arc::new(StandardUserStore::new(pool)),
        RepositoryKind::Sqlx => Arc::new(SqlxUserStore::new(pool)),
        RepositoryKind::Orm => Arc::new(OrmUserStore::new(pool)),
        RepositoryKind::QueryBuilder => Arc::new(QueryBuilderUserStore::new(pool)),
    }
}
