//! User service configuration.

use std::env;

use common::DatabaseConfig;
use domain::DEFAULT_ROLE_ID;

/// Settings handed to the user repository at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserStoreConfig {
    /// Role bound to new users by `assign_default_role`
    pub default_role_id: i32,
}

impl Default for UserStoreConfig {
    fn default() -> Self {
        Self {
            default_role_id: DEFAULT_ROLE_ID,
        }
    }
}

/// User service configuration.
#[derive(Debug, Clone, Default)]
pub struct UserServiceConfig {
    pub database: DatabaseConfig,
    pub store: UserStoreConfig,
}

impl UserServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let default_role_id = env::var("DEFAULT_ROLE_ID")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_ROLE_ID);

        Self {
            database: DatabaseConfig::from_env("USER_SERVICE"),
            store: UserStoreConfig { default_role_id },
        }
    }
}
