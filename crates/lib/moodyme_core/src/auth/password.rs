//! Password hashing via bcrypt.
//!
//! Only the in-memory identity backend stores passwords itself; the hosted
//! provider checks them remotely.

use thiserror::Error;

/// bcrypt cost factor.
pub const BCRYPT_COST: u32 = 10;

#[derive(Debug, Error)]
#[error("Password hashing error: {0}")]
pub struct PasswordError(String);

/// Hash a password with bcrypt at the given cost.
pub fn hash_password(password: &str, cost: u32) -> Result<String, PasswordError> {
    bcrypt::hash(password, cost).map_err(|e| PasswordError(format!("bcrypt hash: {e}")))
}

/// Verify a password against a bcrypt hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    bcrypt::verify(password, hash).map_err(|e| PasswordError(format!("bcrypt verify: {e}")))
}
