use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

use crate::error::{AppError, AppResult};

/// Message for every failed login, so callers cannot tell which half was wrong.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Argon2id PHC string with a fresh random salt.
pub fn hash_password(plain: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("hash password: {e}")))
}

/// Ok when `plain` matches the account's stored hash, `AppError::Auth` otherwise.
/// A stored hash that does not parse is an internal error.
pub fn check_password(plain: &str, stored: &str) -> AppResult<()> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("stored password hash: {e}")))?;
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .map_err(|_| AppError::Auth(INVALID_CREDENTIALS.into()))
}
