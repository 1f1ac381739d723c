//! Repository backed by hand-written SQL mapped through `sqlx::FromRow`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use common::{AppResult, OptionExt, StoreResultExt};
use domain::User;

use super::handle::StoreHandle;
use super::{RepositoryKind, UserRepository};

/// Row shape of the `users` table
#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// `UserRepository` letting sqlx map result rows onto a struct.
#[derive(Debug)]
pub struct SqlxUserStore {
    handle: StoreHandle,
}

impl SqlxUserStore {
    /// Create new repository instance
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            handle: StoreHandle::new(pool, RepositoryKind::Sqlx),
        }
    }
}

#[async_trait]
impl UserRepository for SqlxUserStore {
    fn kind(&self) -> RepositoryKind {
        RepositoryKind::Sqlx
    }

    fn is_open(&self) -> bool {
        self.handle.is_open()
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn get_all(&self) -> AppResult<Vec<User>> {
        let pool = self.handle.pool("get_all")?;
        let rows: Vec<UserRow> = sqlx::query_as(
            "SELECT id, name, email, created_at, updated_at FROM users ORDER BY id",
        )
        .fetch_all(pool)
        .await
        .store_context("get_all")?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn get_by_id(&self, id: i64) -> AppResult<User> {
        let pool = self.handle.pool("get_by_id")?;
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, name, email, created_at, updated_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .store_context("get_by_id")?;

        row.map(User::from).ok_or_not_found()
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn create(&self, name: String, email: String) -> AppResult<User> {
        let pool = self.handle.pool("create")?;
        let now = Utc::now();
        let id = sqlx::query(
            "INSERT INTO users (name, email, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(email)
        .bind(now)
        .bind(now)
        .execute(pool)
            .await
            .store_context("create")?
            .last_insert_rowid();

        // Separate read-back; an error here leaves the inserted row in place.
        let row: UserRow = sqlx::query_as(
            "SELECT id, name, email, created_at, updated_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_one(pool)
        .await
        .store_context("create")?;

        Ok(row.into())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn update(&self, id: i64, name: String, email: String) -> AppResult<()> {
        let pool = self.handle.pool("update")?;
        sqlx::query("UPDATE users SET name = ?, email = ?, updated_at = ? WHERE id = ?")
            .bind(name)
            .bind(email)
            .bind(Utc::now())
            .bind(id)
        .execute(pool)
        .await
        .store_context("update")?;

        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn delete(&self, id: i64) -> AppResult<()> {
        let pool = self.handle.pool("delete")?;
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await
            .store_context("delete")?;

        Ok(())
    }

    async fn close(&self) -> AppResult<()> {
        self.handle.close().await
    }
}
