//! Domain-level constants.
//!
//! These mirror the reference data seeded into the `Roles` table.

// =============================================================================
// Roles
// =============================================================================

/// Role id assigned to new users unless the deployment remaps it
pub const DEFAULT_ROLE_ID: i32 = 1;

/// Id of the administrator role
pub const ADMIN_ROLE_ID: i32 = 2;

/// Name of the default role
pub const ROLE_USER: &str = "User";

/// Name of the administrator role
pub const ROLE_ADMIN: &str = "Admin";

/// Seeded role rows as `(id, name)`
pub const SEEDED_ROLES: &[(i32, &str)] = &[(DEFAULT_ROLE_ID, ROLE_USER), (ADMIN_ROLE_ID, ROLE_ADMIN)];

// =============================================================================
// Normalization
// =============================================================================

/// Character stripped from free-text movie fields
pub const STRIPPED_QUOTE: char = '\'';
