//! Pool ownership shared by all backends.

use sqlx::SqlitePool;

use common::{AppError, AppResult};

use super::RepositoryKind;

/// Owns the pool of one repository until it is closed.
#[derive(Debug)]
pub(crate) struct StoreHandle {
    pool: SqlitePool,
    kind: RepositoryKind,
}

impl StoreHandle {
    pub(crate) fn new(pool: SqlitePool, kind: RepositoryKind) -> Self {
        Self { pool, kind }
    }

    /// Fail with a state error once the handle has been closed
    pub(crate) fn ensure_open(&self, operation: &'static str) -> AppResult<()> {
        if self.pool.is_closed() {
            return Err(AppError::state(format!(
                "{} called on closed {} repository",
                operation, self.kind
            )));
        }
        Ok(())
    }

    /// Pool for `operation`, see [`StoreHandle::ensure_open`]
    pub(crate) fn pool(&self, operation: &'static str) -> AppResult<&SqlitePool> {
        self.ensure_open(operation)?;
        Ok(&self.pool)
    }

    pub(crate) fn is_open(&self) -> bool {
        !self.pool.is_closed()
    }

    /// Close the pool, waiting for checked-out connections to be returned.
    pub(crate) async fn close(&self) -> AppResult<()> {
        if self.pool.is_closed() {
            return Err(AppError::state(format!(
                "{} repository connection already closed",
                self.kind
            )));
        }

        self.pool.close().await;
        tracing::info!(backend = %self.kind, "Repository connection closed");
        Ok(())
    }
}
