//! Session verification
//!
//! Resolves the current actor from the session cookie. Every failure mode
//! (absent cookie, malformed token, bad signature, expiry, persistence
//! trouble) degrades to `None`; callers never receive an error from these
//! functions.

use crate::common::auth::Actor;
use axum::http::{header, HeaderMap};
use sqlx::SqlitePool;

/// Extract the raw session token from the request cookies
pub(crate) fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    for part in cookie_header.split(';') {
        let trimmed = part.trim();
        if let Some(value) = trimmed.strip_prefix(&format!("{}=", crate::auth::AUTH_COOKIE)) {
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Resolve the calling actor from the request headers.
///
/// Pure verification: the claims of a cryptographically valid token are
/// trusted as the identity without a store round-trip. Returns `None` when
/// no token is present or verification fails for any reason.
pub fn resolve_actor(headers: &HeaderMap, secret: &str) -> Option<Actor> {
    let token = extract_session_cookie(headers)?;
    match crate::auth::jwt::verify_jwt(&token, secret) {
        Ok(claims) => Some(Actor::from(claims)),
        Err(e) => {
            tracing::debug!("Session token rejected: {}", e);
            None
        }
    }
}

/// Resolve the calling actor and confirm the account is still active.
///
/// The account-status-checking variant: after verification the usuario row
/// is re-fetched, and an absent or deactivated account reads as no
/// identity. A store failure during the re-fetch also degrades to `None`.
pub async fn resolve_active_actor(
    pool: &SqlitePool,
    headers: &HeaderMap,
    secret: &str,
) -> Option<Actor> {
    let actor = resolve_actor(headers, secret)?;
    match crate::db::usuarios::find_by_id(pool, actor.id).await {
        Ok(Some(usuario)) if usuario.activo => Some(Actor {
            id: usuario.id,
            email: usuario.email,
            nombre: usuario.nombre,
            rol: usuario.rol,
        }),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!("Failed to refresh account status for session: {}", e);
            None
        }
    }
}
