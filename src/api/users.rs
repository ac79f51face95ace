//! User management API
//!
//! Admin CRUD over accounts plus the self-service password change and the
//! per-user activity feed.

use crate::audit::types::{Accion, NuevaBitacora, Seccion};
use crate::common::auth::{Actor, Usuario};
use crate::common::error::ActivosError;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::error::AppError;

/// Password change request (self-service)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    /// Account id
    pub id: Option<i64>,
    /// Current password, verified before the change
    pub current_password: Option<String>,
    /// Replacement password
    pub new_password: Option<String>,
}

/// Activity feed query
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityQuery {
    /// Account id whose activity to list
    pub user_id: Option<i64>,
}

/// User creation request (admin)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Login email
    pub email: String,
    /// Display name
    pub nombre: String,
    /// Initial password
    pub password: String,
    /// Role catalog id
    pub rol_id: i64,
}

/// User update request (admin); absent fields stay untouched
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    /// New email
    pub email: Option<String>,
    /// New display name
    pub nombre: Option<String>,
    /// New role id
    pub rol_id: Option<i64>,
    /// Activate / deactivate the account
    pub activo: Option<bool>,
}

/// Account representation without password material
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Account id
    pub id: i64,
    /// Login email
    pub email: String,
    /// Display name
    pub nombre: String,
    /// Role id
    pub rol_id: i64,
    /// Role name
    pub rol: String,
    /// Whether the account may sign in
    pub activo: bool,
    /// Last successful login (RFC 3339)
    pub ultimo_acceso: Option<String>,
    /// Creation timestamp (RFC 3339)
    pub creado_en: String,
}

impl From<Usuario> for UserResponse {
    fn from(u: Usuario) -> Self {
        UserResponse {
            id: u.id,
            email: u.email,
            nombre: u.nombre,
            rol_id: u.rol_id,
            rol: u.rol,
            activo: u.activo,
            ultimo_acceso: u.ultimo_acceso.map(|dt| dt.to_rfc3339()),
            creado_en: u.creado_en.to_rfc3339(),
        }
    }
}

/// PUT /api/user/password
///
/// Self-service password change, authenticated by knowledge of the current
/// password. Writes one audit record attributed to the changed account.
///
/// # Returns
/// * `200 OK` - password replaced
/// * `400 Bad Request` - missing fields or wrong current password
/// * `404 Not Found` - unknown account id
pub async fn change_password(
    State(state): State<AppState>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<serde_json::Value>, Response> {
    let (id, current_password, new_password) =
        match (request.id, request.current_password, request.new_password) {
            (Some(id), Some(c), Some(n)) if !c.is_empty() && !n.is_empty() => (id, c, n),
            _ => {
                return Err(AppError(ActivosError::Validation(
                    "Missing required fields".into(),
                ))
                .into_response())
            }
        };

    let usuario = crate::db::usuarios::find_by_id(&state.db_pool, id)
        .await
        .map_err(|e| AppError(e).into_response())?
        .ok_or_else(|| {
            AppError(ActivosError::NotFound("User not found".into())).into_response()
        })?;

    let is_valid =
        crate::auth::password::verify_password(&current_password, &usuario.password_hash)
            .map_err(|e| AppError(e).into_response())?;
    if !is_valid {
        return Err(AppError(ActivosError::Validation(
            "Current password is incorrect".into(),
        ))
        .into_response());
    }

    let password_hash = crate::auth::password::hash_password(&new_password)
        .map_err(|e| AppError(e).into_response())?;
    crate::db::usuarios::update_password(&state.db_pool, id, &password_hash)
        .await
        .map_err(|e| AppError(e).into_response())?;

    state
        .audit
        .record(
            NuevaBitacora::new(Accion::CambioContrasena, Seccion::Perfil, id)
                .detalles(json!({ "usuario": usuario.email })),
        )
        .await;

    Ok(Json(json!({
        "message": "Contraseña actualizada correctamente"
    })))
}

/// GET /api/user/activity?userId=
///
/// The 5 most recent audit records for one account, fecha descending.
///
/// # Returns
/// * `200 OK` - array of audit records
/// * `400 Bad Request` - missing userId
pub async fn activity(
    State(state): State<AppState>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Vec<crate::audit::types::Bitacora>>, Response> {
    let user_id = query.user_id.ok_or_else(|| {
        AppError(ActivosError::Validation("Missing userId".into())).into_response()
    })?;

    let records = crate::db::bitacora::recientes_por_autor(&state.db_pool, user_id, 5)
        .await
        .map_err(|e| AppError(e).into_response())?;

    Ok(Json(records))
}

/// GET /api/users (admin)
pub async fn list(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, Response> {
    crate::auth::middleware::require_admin(&actor)?;

    let usuarios = crate::db::usuarios::list(&state.db_pool)
        .await
        .map_err(|e| AppError(e).into_response())?;

    Ok(Json(usuarios.into_iter().map(UserResponse::from).collect()))
}

/// POST /api/users (admin)
///
/// # Returns
/// * `201 Created` - account created, one audit record
/// * `409 Conflict` - email already registered
pub async fn create(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), Response> {
    crate::auth::middleware::require_admin(&actor)?;

    let password_hash = crate::auth::password::hash_password(&request.password)
        .map_err(|e| AppError(e).into_response())?;

    let usuario = crate::db::usuarios::create(
        &state.db_pool,
        &request.email,
        &request.nombre,
        &password_hash,
        request.rol_id,
    )
    .await
    .map_err(|e| AppError(e).into_response())?;

    state
        .audit
        .record(
            NuevaBitacora::new(Accion::CreacionUsuario, Seccion::Usuarios, actor.id)
                .elemento(usuario.id)
                .detalles(json!({ "usuario": usuario.email })),
        )
        .await;

    Ok((StatusCode::CREATED, Json(UserResponse::from(usuario))))
}

/// PUT /api/users/:id (admin)
pub async fn update(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, Response> {
    crate::auth::middleware::require_admin(&actor)?;

    let mut cambios: Vec<&str> = Vec::new();
    if request.email.is_some() {
        cambios.push("email");
    }
    if request.nombre.is_some() {
        cambios.push("nombre");
    }
    if request.rol_id.is_some() {
        cambios.push("rol");
    }
    if request.activo.is_some() {
        cambios.push("activo");
    }

    let usuario = crate::db::usuarios::update(
        &state.db_pool,
        id,
        request.email.as_deref(),
        request.nombre.as_deref(),
        request.rol_id,
        request.activo,
    )
    .await
    .map_err(|e| AppError(e).into_response())?;

    state
        .audit
        .record(
            NuevaBitacora::new(Accion::EdicionUsuario, Seccion::Usuarios, actor.id)
                .elemento(usuario.id)
                .detalles(json!({ "usuario": usuario.email, "cambios": cambios })),
        )
        .await;

    Ok(Json(UserResponse::from(usuario)))
}

/// DELETE /api/users/:id (admin)
///
/// The last active administrator cannot be deleted.
pub async fn remove(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, Response> {
    crate::auth::middleware::require_admin(&actor)?;

    let usuario = crate::db::usuarios::find_by_id(&state.db_pool, id)
        .await
        .map_err(|e| AppError(e).into_response())?
        .ok_or_else(|| {
            AppError(ActivosError::NotFound("Usuario no encontrado".into())).into_response()
        })?;

    if crate::db::usuarios::is_last_admin(&state.db_pool, id)
        .await
        .map_err(|e| AppError(e).into_response())?
    {
        return Err(AppError(ActivosError::Conflict(
            "No se puede eliminar el último administrador".into(),
        ))
        .into_response());
    }

    crate::db::usuarios::delete(&state.db_pool, id)
        .await
        .map_err(|e| AppError(e).into_response())?;

    state
        .audit
        .record(
            NuevaBitacora::new(Accion::EliminacionUsuario, Seccion::Usuarios, actor.id)
                .elemento(id)
                .detalles(json!({ "usuario": usuario.email })),
        )
        .await;

    Ok(StatusCode::NO_CONTENT)
}
