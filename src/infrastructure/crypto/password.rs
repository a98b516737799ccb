//! Password hashing utilities

use bcrypt::{hash, verify};
use thiserror::Error;

/// bcrypt work factor. Tests use [`MIN_COST`] through
/// [`hash_password_with_cost`] to stay fast.
pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

/// bcrypt's minimum work factor (the crate keeps its own `MIN_COST` private).
#[cfg(test)]
pub(crate) const MIN_COST: u32 = 4;

/// Hash a password using bcrypt
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(password, cost)
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, hash)
}

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error(transparent)]
    Bcrypt(#[from] bcrypt::BcryptError),
    #[error("password task panicked: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// [`hash_password_with_cost`] on the blocking pool, off the async workers.
pub async fn hash_password_async(password: &str, cost: u32) -> Result<String, PasswordError> {
    let password = password.to_owned();
    Ok(tokio::task::spawn_blocking(move || hash_password_with_cost(&password, cost)).await??)
}

/// [`verify_password`] on the blocking pool.
pub async fn verify_password_async(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let (password, hash) = (password.to_owned(), hash.to_owned());
    Ok(tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await??)
}
