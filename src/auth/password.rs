// Password hashing and verification (bcrypt)

use crate::common::error::ActivosError;
use bcrypt::{hash, verify};

/// bcrypt cost (12 recommended, 200-300ms)
const HASH_COST: u32 = 12;

/// Hash a password with bcrypt
///
/// # Returns
/// * `Ok(String)` - bcrypt hash string (starts with $2b$)
/// * `Err(ActivosError)` - hashing failure
pub fn hash_password(password: &str) -> Result<String, ActivosError> {
    hash(password, HASH_COST)
        .map_err(|e| ActivosError::PasswordHash(format!("Failed to hash password: {}", e)))
}

/// Verify a plaintext password against a bcrypt hash
///
/// # Returns
/// * `Ok(true)` - password matches
/// * `Ok(false)` - password does not match
/// * `Err(ActivosError)` - verification failure (malformed hash)
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ActivosError> {
    verify(password, hash)
        .map_err(|e| ActivosError::PasswordHash(format!("Failed to verify password: {}", e)))
}
