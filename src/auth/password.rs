//! Password hashing and verification using bcrypt
//!
//! bcrypt is CPU bound, so both operations run on the blocking pool.

use crate::core::error::{AppError, Result};
use tokio::task;

/// Work factor used for new digests unless configured otherwise
pub const DEFAULT_COST: u32 = 10;

/// Hash a password with a freshly generated salt
pub async fn hash_password(password: &str, cost: u32) -> Result<String> {
    let password = password.to_string();
    task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::TaskError(format!("Hashing task panicked: {}", e)))?
        .map_err(|e| AppError::HashingError(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a stored digest
pub async fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let password = password.to_string();
    let hash = hash.to_string();
    task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::TaskError(format!("Verification task panicked: {}", e)))?
        .map_err(|e| AppError::HashingError(format!("Failed to verify password: {}", e)))
}
