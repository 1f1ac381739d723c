//! Database connection and initialization.

use std::collections::HashSet;
use std::str::FromStr;
use std::time::Duration;

use sea_orm::{DatabaseConnection, SqlxSqliteConnector};
use sea_orm_migration::MigratorTrait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use common::{AppResult, DatabaseConfig, StoreResultExt};

use super::migrations::Migrator;

/// Database wrapper for connection management
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect (retrying while the store is unreachable) and run migrations.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let db = Self::connect_without_migrations(config).await?;

        // Run pending migrations
        db.run_migrations().await?;
        tracing::info!("Database connected and migrations applied");

        Ok(db)
    }

    /// Connect without running migrations (for CLI commands).
    pub async fn connect_without_migrations(config: &DatabaseConfig) -> AppResult<Self> {
        let attempts = config.connect_retries.max(1);
        let delay = Duration::from_millis(config.retry_delay_ms);
        let mut attempt = 1;

        loop {
            match Self::open_pool(config).await {
                Ok(pool) => {
                    tracing::info!(attempt, "Database connection established");
                    return Ok(Self { pool });
                }
                Err(e) if attempt < attempts => {
                    tracing::warn!(
                        attempt,
                        max_attempts = attempts,
                        error = %e,
                        "Waiting for database..."
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e).store_context("connect"),
            }
        }
    }

    /// Single-connection in-memory store with migrations applied (for tests).
    ///
    /// Every pooled connection to `sqlite::memory:` would see its own empty
    /// database, so the pool is pinned to one connection that never expires.
    pub async fn in_memory() -> AppResult<Self> {
        let options =
            SqliteConnectOptions::from_str("sqlite::memory:").store_context("connect")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await
            .store_context("connect")?;

        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    async fn open_pool(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .connect_with(options)
            .await?;

        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(pool)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Hand the pool over to a repository.
    pub fn into_pool(self) -> SqlitePool {
        self.pool
    }

    fn orm_connection(&self) -> DatabaseConnection {
        SqlxSqliteConnector::from_sqlx_sqlite_pool(self.pool.clone())
    }

    /// Run pending migrations.
    pub async fn run_migrations(&self) -> AppResult<()> {
        Migrator::up(&self.orm_connection(), None)
            .await
            .store_context("migrate")
    }

    /// Rollback the last migration.
    pub async fn rollback_migration(&self) -> AppResult<()> {
        Migrator::down(&self.orm_connection(), Some(1))
            .await
            .store_context("migrate")
    }

    /// Get migration status (list all migrations with applied status).
    pub async fn migration_status(&self) -> AppResult<Vec<(String, bool)>> {
        use sea_orm::{EntityTrait, QueryOrder};
        use sea_orm_migration::seaql_migrations;

        // Get applied migrations from database
        let applied: HashSet<String> = seaql_migrations::Entity::find()
            .order_by_asc(seaql_migrations::Column::Version)
            .all(&self.orm_connection())
            .await
            .store_context("migrate")?
            .into_iter()
            .map(|m| m.version)
            .collect();

        // Map all defined migrations with their applied status
        Ok(Migrator::migrations()
            .iter()
            .map(|m| {
                let name = m.name().to_string();
                let is_applied = applied.contains(&name);
                (name, is_applied)
            })
            .collect())
    }

    /// Reset database and run all migrations fresh.
    pub async fn fresh_migrations(&self) -> AppResult<()> {
        Migrator::fresh(&self.orm_connection())
            .await
            .store_context("migrate")
    }

    /// Check database connectivity by executing a simple query.
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .store_context("ping")?;
        Ok(())
    }
}
