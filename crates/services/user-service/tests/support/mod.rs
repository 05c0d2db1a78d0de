// Common test utilities for integration tests
#![allow(dead_code)]

use common::DatabaseConfig;
use user_service_lib::config::UserStoreConfig;
use user_service_lib::infra::Database;
use user_service_lib::repository::UserStore;

/// In-memory databases live and die with their connection, so the pool is
/// pinned to exactly one.
pub fn memory_config() -> DatabaseConfig {
    DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    }
}

/// Creates a test database with migrations applied
pub async fn setup_test_db() -> Database {
    Database::connect(&memory_config())
        .await
        .expect("Failed to create test database")
}

/// Creates a store with the default configuration over a fresh database
pub async fn setup_store() -> (UserStore, Database) {
    setup_store_with(UserStoreConfig::default()).await
}

/// Creates a store with a custom configuration over a fresh database
pub async fn setup_store_with(config: UserStoreConfig) -> (UserStore, Database) {
    let db = setup_test_db().await;
    (UserStore::new(db.get_connection(), config), db)
}
