//! Repository backed by hand-written SQL with manual column decoding.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use common::{AppResult, OptionExt, StoreResultExt};
use domain::User;

use super::handle::StoreHandle;
use super::{RepositoryKind, UserRepository};

const SELECT_ALL: &str =
    "SELECT id, name, email, created_at, updated_at FROM users ORDER BY id";
const SELECT_BY_ID: &str =
    "SELECT id, name, email, created_at, updated_at FROM users WHERE id = ?";
const INSERT: &str =
    "INSERT INTO users (name, email, created_at, updated_at) VALUES (?, ?, ?, ?)";
const UPDATE: &str = "UPDATE users SET name = ?, email = ?, updated_at = ? WHERE id = ?";
const DELETE: &str = "DELETE FROM users WHERE id = ?";

/// `UserRepository` issuing raw queries and decoding each column by name.
#[derive(Debug)]
pub struct StandardUserStore {
    handle: StoreHandle,
}

impl StandardUserStore {
    /// Create new repository instance
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            handle: StoreHandle::new(pool, RepositoryKind::Standard),
        }
    }
}

fn decode_user(row: &SqliteRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl UserRepository for StandardUserStore {
    fn kind(&self) -> RepositoryKind {
        RepositoryKind::Standard
    }

    fn is_open(&self) -> bool {
        self.handle.is_open()
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn get_all(&self) -> AppResult<Vec<User>> {
        let pool = self.handle.pool("get_all")?;
        let rows = sqlx::query(SELECT_ALL)
            .fetch_all(pool)
            .await
            .store_context("get_all")?;

        rows.iter()
            .map(decode_user)
            .collect::<Result<Vec<_>, _>>()
            .store_context("get_all")
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn get_by_id(&self, id: i64) -> AppResult<User> {
        let pool = self.handle.pool("get_by_id")?;
        let row = sqlx::query(SELECT_BY_ID)
            .bind(id)
            .fetch_optional(pool)
            .await
            .store_context("get_by_id")?
            .ok_or_not_found()?;

        decode_user(&row).store_context("get_by_id")
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn create(&self, name: String, email: String) -> AppResult<User> {
        let pool = self.handle.pool("create")?;
        let now = Utc::now();
        let result = sqlx::query(INSERT)
            .bind(&name)
            .bind(&email)
            .bind(now)
            .bind(now)
            .execute(pool)
            .await
            .store_context("create")?;

        // The row is durable from here on; a failed read-back is still reported.
        let row = sqlx::query(SELECT_BY_ID)
            .bind(result.last_insert_rowid())
            .fetch_one(pool)
            .await
            .store_context("create")?;

        decode_user(&row).store_context("create")
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn update(&self, id: i64, name: String, email: String) -> AppResult<()> {
        let pool = self.handle.pool("update")?;
        let result = sqlx::query(UPDATE)
            .bind(&name)
            .bind(&email)
            .bind(Utc::now())
            .bind(id)
            .execute(pool)
            .await
            .store_context("update")?;

        tracing::debug!(rows_affected = result.rows_affected(), "User updated");
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn delete(&self, id: i64) -> AppResult<()> {
        let pool = self.handle.pool("delete")?;
        let result = sqlx::query(DELETE)
            .bind(id)
            .execute(pool)
            .await
            .store_context("delete")?;

        tracing::debug!(rows_affected = result.rows_affected(), "User deleted");
        Ok(())
    }

    async fn close(&self) -> AppResult<()> {
        self.handle.close().await
    }
}
