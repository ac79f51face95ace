// JWT creation and verification (jsonwebtoken)

use crate::common::auth::Claims;
use crate::common::error::ActivosError;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

/// Session token lifetime (hours)
const SESSION_EXPIRATION_HOURS: i64 = 24;

/// Session token lifetime in seconds, for cookie Max-Age
pub const SESSION_EXPIRATION_SECS: usize = (SESSION_EXPIRATION_HOURS * 3600) as usize;

/// Create a signed session token carrying the actor claims
///
/// # Arguments
/// * `user_id` - user id (sub claim)
/// * `email` - login email
/// * `nombre` - display name
/// * `rol` - role name
/// * `secret` - signing secret
pub fn create_jwt(
    user_id: i64,
    email: &str,
    nombre: &str,
    rol: &str,
    secret: &str,
) -> Result<String, ActivosError> {
    let expiration = Utc::now()
        .checked_add_signed(chrono::Duration::hours(SESSION_EXPIRATION_HOURS))
        .ok_or_else(|| ActivosError::Jwt("Failed to calculate expiration time".to_string()))?
        .timestamp() as usize;

    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        nombre: nombre.to_string(),
        rol: rol.to_string(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ActivosError::Jwt(format!("Failed to create JWT: {}", e)))
}

/// Verify a session token and return its claims
///
/// Fails on tampering, expiry, structural problems and wrong secrets.
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, ActivosError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| ActivosError::Jwt(format!("Failed to verify JWT: {}", e)))
}
