//! SeaORM entities for the Users, Roles and UserRoles tables.

pub mod role;
pub mod user;
pub mod user_role;
