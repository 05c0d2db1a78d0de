//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! user and role records, credential hashing, and the movie text normalizer.

pub mod constants;
pub mod error;
pub mod movie;
pub mod password;
pub mod user;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use movie::{normalize_text, MovieDescriptor, MovieInput, StoredMovieDescriptor};
pub use user::{CreatedUser, Role, User, UserCredentials};
