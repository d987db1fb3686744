//! Salted argon2id password hashes.
//!
//! Hashing is deliberately slow, so handlers call these through
//! `spawn_blocking`.

use crate::error::FrontError;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hashes `password` with a fresh random salt into a PHC string.
pub fn hash_password(password: &str) -> Result<String, FrontError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| FrontError::Internal(format!("password hashing failed: {e}")))
}

/// Checks `password` against a stored PHC string. A malformed hash never matches.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is not a valid PHC string.");
            false
        }
    }
}

pub async fn hash_in_background(password: String) -> Result<String, FrontError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| FrontError::Internal(e.to_string()))?
}

pub async fn verify_in_background(password: String, stored_hash: String) -> Result<bool, FrontError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| FrontError::Internal(e.to_string()))
}
