// Session-guard middleware

use crate::common::auth::Actor;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Require a valid session with an active account.
///
/// On success the resolved `Actor` is inserted as a request extension for
/// downstream handlers. On failure the request is rejected with 401 without
/// reaching the handler.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let actor = crate::auth::session::resolve_active_actor(
        &state.db_pool,
        request.headers(),
        &state.jwt_secret,
    )
    .await
    .ok_or_else(|| {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "No autenticado" })),
        )
            .into_response()
    })?;

    request.extensions_mut().insert(actor);
    Ok(next.run(request).await)
}

/// Reject actors without the administrator role with 403.
///
/// Used inside handlers that sit behind `require_session`.
pub fn require_admin(actor: &Actor) -> Result<(), Response> {
    if actor.rol == crate::common::auth::Usuario::ROL_ADMINISTRADOR {
        Ok(())
    } else {
        Err((
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "Se requiere rol de administrador" })),
        )
            .into_response())
    }
}
