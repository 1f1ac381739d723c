//! User Service Library
//!
//! This crate owns the `users` table: the repository contract, its four
//! interchangeable backends, store bootstrap and schema migrations.
//! The HTTP layer lives in the gateway crate and only sees
//! [`UserRepository`] trait objects.

pub mod infra;
pub mod repository;

use std::sync::Arc;

use tracing::info;

use common::{AppResult, DatabaseConfig};

use crate::infra::Database;

pub use repository::{build_repository, RepositoryKind, UserRepository};

/// Connect to the store, apply migrations and build the selected backend.
pub async fn connect_repository(
    kind: RepositoryKind,
    config: &DatabaseConfig,
) -> AppResult<Arc<dyn UserRepository>> {
    let db = Database::connect(config).await?;
    info!(backend = %kind, "Database connection ready");

    Ok(build_repository(kind, db.into_pool()))
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction, config: &DatabaseConfig) -> AppResult<()> {
    let db = Database::connect_without_migrations(config).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    db.into_pool().close().await;
    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
