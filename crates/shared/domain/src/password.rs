//! Credential hashing.
//!
//! Argon2id with a fresh random salt per call. The stored string is a PHC
//! hash that embeds the algorithm parameters and salt, so verification needs
//! nothing else.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{DomainError, DomainResult};

/// Hash a plaintext password into a self-contained hash string.
///
/// # Errors
/// Returns `DomainError::Password` if the hasher rejects the input.
pub fn hash(plain_text: &str) -> DomainResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain_text.as_bytes(), &salt)
        .map_err(|e| DomainError::password(format!("Password hash failed: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a plaintext password against a stored hash string.
///
/// A malformed hash never matches.
pub fn verify(plain_text: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
