//! One-way password hashing.
//!
//! bcrypt embeds a per-hash random salt, so equal passwords produce distinct
//! hashes and stored values can never be reversed into the original. Hashing
//! is applied exactly once per write that carries a new password; updates
//! that leave the password untouched must not pass through here.

use crate::config;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("hashing failed: {0}")]
    Hash(String),
    #[error("verification failed: {0}")]
    Verify(String),
}

pub fn hash(plain: &str) -> Result<String, PasswordError> {
    let cost = config::config().security.bcrypt_cost;
    bcrypt::hash(plain, cost).map_err(|e| PasswordError::Hash(e.to_string()))
}

pub fn verify(plain: &str, hashed: &str) -> Result<bool, PasswordError> {
    bcrypt::verify(plain, hashed).map_err(|e| PasswordError::Verify(e.to_string()))
}
