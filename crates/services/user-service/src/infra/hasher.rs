//! Async glue for password hashing.
//!
//! Hashing is CPU-bound, so both operations run on the blocking thread pool
//! instead of the async workers.

use common::{AppError, AppResult};
use domain::password;

/// Hash a plaintext password.
pub async fn hash_password(plain_text: &str) -> AppResult<String> {
    let plain_text = plain_text.to_string();

    tokio::task::spawn_blocking(move || password::hash(&plain_text))
        .await
        .map_err(|e| AppError::internal(format!("Hashing task failed: {}", e)))?
        .map_err(AppError::from)
}

/// Verify a plaintext password against a stored hash.
pub async fn verify_password(plain_text: &str, hash: &str) -> AppResult<bool> {
    let plain_text = plain_text.to_string();
    let hash = hash.to_string();

    tokio::task::spawn_blocking(move || password::verify(&plain_text, &hash))
        .await
        .map_err(|e| AppError::internal(format!("Verification task failed: {}", e)))
}
