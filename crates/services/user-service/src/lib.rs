//! User Service Library
//!
//! Data-access layer for user accounts, credentials and role assignments,
//! with a thin service layer and an administrative CLI on top.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use common::AppResult;
use tracing::info;

use crate::config::{UserServiceConfig, UserStoreConfig};
use crate::infra::Database;
use crate::repository::UserStore;
use crate::service::{UserManager, UserService};

/// Wire the repository and service over an open database.
pub fn build_user_service(db: &Database, store: UserStoreConfig) -> Arc<dyn UserService> {
    let user_repo = Arc::new(UserStore::new(db.get_connection(), store));
    Arc::new(UserManager::new(user_repo))
}

/// Connect, apply pending migrations and build the user service.
pub async fn connect(config: &UserServiceConfig) -> AppResult<Arc<dyn UserService>> {
    let db = Database::connect(&config.database).await?;
    Ok(build_user_service(&db, config.store))
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(config: &UserServiceConfig, action: MigrateAction) -> AppResult<()> {
    let db = Database::connect_without_migrations(&config.database).await?;

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

    Ok(())
}

/// Check database connectivity.
pub async fn ping(config: &UserServiceConfig) -> AppResult<()> {
    let db = Database::connect_without_migrations(&config.database).await?;
    db.ping().await?;
    info!("Database reachable");
    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
