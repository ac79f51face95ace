//! Authentication API
//!
//! Login, logout, session lookup and the password-reset token flow.

use crate::audit::types::{Accion, NuevaBitacora, Seccion};
use crate::common::auth::Actor;
use crate::common::error::ActivosError;
use crate::AppState;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::error::AppError;

/// Reset tokens stay valid for one hour
const RESET_TOKEN_EXPIRATION_HOURS: i64 = 1;

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login email
    pub email: Option<String>,
    /// Password
    pub password: Option<String>,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// The authenticated actor
    pub user: Actor,
}

/// Session lookup response
#[derive(Debug, Serialize)]
pub struct MeResponse {
    /// The current actor, or null when unauthenticated
    pub user: Option<Actor>,
}

/// Forgot-password request
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    /// Account email
    pub email: Option<String>,
}

/// Reset-password request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    /// Reset token from the delivery channel
    pub token: Option<String>,
    /// Replacement password
    pub new_password: Option<String>,
}

/// POST /api/auth/login
///
/// Verifies credentials against an active account, issues the session
/// cookie and records the login in the bitacora.
///
/// # Returns
/// * `200 OK` - session cookie set, body carries the actor
/// * `400 Bad Request` - missing fields
/// * `401 Unauthorized` - unknown email, inactive account or wrong password
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, Response> {
    let (email, password) = match (request.email, request.password) {
        (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
        _ => {
            return Err(
                AppError(ActivosError::Validation("Missing required fields".into()))
                    .into_response(),
            )
        }
    };

    let credenciales_invalidas =
        || AppError(ActivosError::Authentication("Credenciales inválidas".into())).into_response();

    let usuario = crate::db::usuarios::find_by_email(&state.db_pool, &email)
        .await
        .map_err(|e| AppError(e).into_response())?
        .filter(|u| u.activo)
        .ok_or_else(credenciales_invalidas)?;

    let is_valid = crate::auth::password::verify_password(&password, &usuario.password_hash)
        .map_err(|e| AppError(e).into_response())?;
    if !is_valid {
        return Err(credenciales_invalidas());
    }

    // Stamp the login; failure here must not block the session
    crate::db::usuarios::update_ultimo_acceso(&state.db_pool, usuario.id)
        .await
        .map_err(|e| tracing::warn!("Failed to update last login: {}", e))
        .ok();

    let token = crate::auth::jwt::create_jwt(
        usuario.id,
        &usuario.email,
        &usuario.nombre,
        &usuario.rol,
        &state.jwt_secret,
    )
    .map_err(|e| AppError(e).into_response())?;

    state
        .audit
        .record(
            NuevaBitacora::new(Accion::InicioSesion, Seccion::Autenticacion, usuario.id)
                .detalles(json!({ "usuario": usuario.email })),
        )
        .await;

    let cookie = crate::auth::build_auth_cookie(
        &token,
        crate::auth::jwt::SESSION_EXPIRATION_SECS,
        is_request_secure(&headers),
    );
    let mut response_headers = HeaderMap::new();
    response_headers.insert(header::SET_COOKIE, cookie.parse().unwrap());

    Ok((
        StatusCode::OK,
        response_headers,
        Json(LoginResponse {
            user: Actor {
                id: usuario.id,
                email: usuario.email,
                nombre: usuario.nombre,
                rol: usuario.rol,
            },
        }),
    ))
}

/// POST /api/auth/logout
///
/// Clears the session cookie. When a valid session was presented, the
/// logout is recorded in the bitacora; an anonymous call just clears.
///
/// # Returns
/// * `204 No Content`
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(actor) = crate::auth::session::resolve_actor(&headers, &state.jwt_secret) {
        state
            .audit
            .record(
                NuevaBitacora::new(Accion::CierreSesion, Seccion::Autenticacion, actor.id)
                    .detalles(json!({ "usuario": actor.email })),
            )
            .await;
    }

    let cookie = crate::auth::clear_auth_cookie(is_request_secure(&headers));
    let mut response_headers = HeaderMap::new();
    response_headers.insert(header::SET_COOKIE, cookie.parse().unwrap());
    (StatusCode::NO_CONTENT, response_headers)
}

/// GET /api/auth/me
///
/// Resolves the current session. Always answers 200; an absent, invalid or
/// expired session (or a deactivated account) reads as `{"user": null}`.
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> Json<MeResponse> {
    let user =
        crate::auth::session::resolve_active_actor(&state.db_pool, &headers, &state.jwt_secret)
            .await;
    Json(MeResponse { user })
}

/// POST /api/auth/forgot-password
///
/// Issues a reset token for an existing active account. Always answers
/// with the same generic message so the endpoint cannot be used to probe
/// which emails are registered. Token delivery (email) is handled outside
/// this service.
///
/// # Returns
/// * `200 OK` - generic message
/// * `400 Bad Request` - missing email
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<Json<serde_json::Value>, Response> {
    let email = request
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| {
            AppError(ActivosError::Validation("Missing required fields".into())).into_response()
        })?;

    let usuario = crate::db::usuarios::find_by_email(&state.db_pool, &email)
        .await
        .map_err(|e| AppError(e).into_response())?
        .filter(|u| u.activo);

    if let Some(usuario) = usuario {
        let token = crate::auth::generate_random_token(48);
        let token_hash = crate::db::usuarios::hash_token(&token);
        let expira = chrono::Utc::now() + chrono::Duration::hours(RESET_TOKEN_EXPIRATION_HOURS);

        crate::db::usuarios::set_reset_token(&state.db_pool, usuario.id, &token_hash, expira)
            .await
            .map_err(|e| AppError(e).into_response())?;

        tracing::info!(usuario = usuario.id, "Password reset token issued");
    }

    Ok(Json(json!({
        "message": "Si el correo está registrado, se enviarán instrucciones"
    })))
}

/// POST /api/auth/reset-password
///
/// Consumes a reset token and replaces the account password. No audit
/// record is written on any failure path.
///
/// # Returns
/// * `200 OK` - password replaced, token cleared, one audit record
/// * `400 Bad Request` - missing fields, unknown token, or expired token
pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<serde_json::Value>, Response> {
    let (token, new_password) = match (request.token, request.new_password) {
        (Some(t), Some(p)) if !t.is_empty() && !p.is_empty() => (t, p),
        _ => {
            return Err(
                AppError(ActivosError::Validation("Missing required fields".into()))
                    .into_response(),
            )
        }
    };

    let token_hash = crate::db::usuarios::hash_token(&token);
    let usuario = crate::db::usuarios::find_by_reset_token(&state.db_pool, &token_hash)
        .await
        .map_err(|e| AppError(e).into_response())?
        .ok_or_else(|| {
            AppError(ActivosError::Validation("Invalid or expired token".into())).into_response()
        })?;

    let vigente = usuario
        .reset_token_expira
        .map(|expira| expira > chrono::Utc::now())
        .unwrap_or(false);
    if !vigente {
        return Err(AppError(ActivosError::Validation("Token expired".into())).into_response());
    }

    let password_hash = crate::auth::password::hash_password(&new_password)
        .map_err(|e| AppError(e).into_response())?;
    crate::db::usuarios::update_password(&state.db_pool, usuario.id, &password_hash)
        .await
        .map_err(|e| AppError(e).into_response())?;
    crate::db::usuarios::clear_reset_token(&state.db_pool, usuario.id)
        .await
        .map_err(|e| AppError(e).into_response())?;

    state
        .audit
        .record(
            NuevaBitacora::new(
                Accion::RestablecimientoContrasena,
                Seccion::Autenticacion,
                usuario.id,
            )
            .detalles(json!({ "usuario": usuario.email })),
        )
        .await;

    Ok(Json(json!({
        "message": "Contraseña actualizada correctamente"
    })))
}

fn is_request_secure(headers: &HeaderMap) -> bool {
    if let Some(proto) = headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
    {
        if proto.eq_ignore_ascii_case("https") {
            return true;
        }
    }
    if let Some(forwarded) = headers
        .get("forwarded")
        .and_then(|value| value.to_str().ok())
    {
        if forwarded.to_ascii_lowercase().contains("proto=https") {
            return true;
        }
    }
    false
}
