//! Migrate command - Database migration management.

use common::AppResult;
use user_service_lib::MigrateAction;

use crate::cli::args::{MigrateArgs, MigrateCommand};
use crate::config::GatewayConfig;

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: GatewayConfig) -> AppResult<()> {
    let action = match args.action {
        MigrateCommand::Up => MigrateAction::Up,
        MigrateCommand::Down => MigrateAction::Down,
        MigrateCommand::Status => MigrateAction::Status,
        MigrateCommand::Fresh => {
            tracing::warn!("Resetting database and running all migrations...");
            MigrateAction::Fresh
        }
    };

    tracing::info!(?action, url = %config.database.url, "Running migration command...");
    user_service_lib::run_migrations(action, &config.database).await
}
