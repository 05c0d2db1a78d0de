//! Infrastructure layer - database, migrations and credential hashing.

mod db;
pub mod hasher;
pub mod migrations;

pub use db::Database;
pub use migrations::Migrator;
