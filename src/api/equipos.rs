//! Equipment registry API

use crate::audit::types::{Accion, NuevaBitacora, Seccion};
use crate::common::auth::Actor;
use crate::common::error::ActivosError;
use crate::db::equipos::{Equipo, EquipoFilter, EquipoUpdate, NuevoEquipo};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;

use super::error::AppError;

/// Equipment registration request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEquipoRequest {
    /// Display name
    pub nombre: String,
    /// Equipment type
    pub tipo: String,
    /// Brand
    pub marca: Option<String>,
    /// Model
    pub modelo: Option<String>,
    /// Serial number (unique)
    pub numero_serie: String,
    /// Color catalog id
    pub color_id: Option<i64>,
    /// Status catalog id
    pub estatus_id: i64,
    /// Assigned user id
    pub asignado_a: Option<i64>,
    /// Free-form notes
    pub notas: Option<String>,
}

/// Equipment update request; absent fields stay untouched
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEquipoRequest {
    /// New display name
    pub nombre: Option<String>,
    /// New type
    pub tipo: Option<String>,
    /// New brand
    pub marca: Option<String>,
    /// New model
    pub modelo: Option<String>,
    /// New color id
    pub color_id: Option<i64>,
    /// New status id
    pub estatus_id: Option<i64>,
    /// New assignee
    pub asignado_a: Option<i64>,
    /// New notes
    pub notas: Option<String>,
}

/// Equipment list filters
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipoListQuery {
    /// Filter by status id
    pub estatus_id: Option<i64>,
    /// Filter by assignee id
    pub asignado_a: Option<i64>,
}

/// GET /api/equipos
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<EquipoListQuery>,
) -> Result<Json<Vec<Equipo>>, Response> {
    let filter = EquipoFilter {
        estatus_id: query.estatus_id,
        asignado_a: query.asignado_a,
    };
    let equipos = crate::db::equipos::list(&state.db_pool, &filter)
        .await
        .map_err(|e| AppError(e).into_response())?;
    Ok(Json(equipos))
}

/// GET /api/equipos/:id
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Equipo>, Response> {
    let equipo = crate::db::equipos::find_by_id(&state.db_pool, id)
        .await
        .map_err(|e| AppError(e).into_response())?
        .ok_or_else(|| {
            AppError(ActivosError::NotFound("Equipo no encontrado".into())).into_response()
        })?;
    Ok(Json(equipo))
}

/// POST /api/equipos
///
/// # Returns
/// * `201 Created` - equipment registered, one audit record
/// * `409 Conflict` - duplicate serial number
pub async fn create(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Json(request): Json<CreateEquipoRequest>,
) -> Result<(StatusCode, Json<Equipo>), Response> {
    let nuevo = NuevoEquipo {
        nombre: request.nombre,
        tipo: request.tipo,
        marca: request.marca,
        modelo: request.modelo,
        numero_serie: request.numero_serie,
        color_id: request.color_id,
        estatus_id: request.estatus_id,
        asignado_a: request.asignado_a,
        notas: request.notas,
    };

    let equipo = crate::db::equipos::create(&state.db_pool, &nuevo)
        .await
        .map_err(|e| AppError(e).into_response())?;

    state
        .audit
        .record(
            NuevaBitacora::new(Accion::RegistroEquipo, Seccion::Equipos, actor.id)
                .elemento(equipo.id)
                .detalles(json!({
                    "numero_serie": equipo.numero_serie,
                    "nombre": equipo.nombre,
                })),
        )
        .await;

    Ok((StatusCode::CREATED, Json(equipo)))
}

/// PUT /api/equipos/:id
pub async fn update(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateEquipoRequest>,
) -> Result<Json<Equipo>, Response> {
    let mut cambios: Vec<&str> = Vec::new();
    if request.nombre.is_some() {
        cambios.push("nombre");
    }
    if request.tipo.is_some() {
        cambios.push("tipo");
    }
    if request.marca.is_some() {
        cambios.push("marca");
    }
    if request.modelo.is_some() {
        cambios.push("modelo");
    }
    if request.color_id.is_some() {
        cambios.push("color");
    }
    if request.estatus_id.is_some() {
        cambios.push("estatus");
    }
    if request.asignado_a.is_some() {
        cambios.push("asignado_a");
    }
    if request.notas.is_some() {
        cambios.push("notas");
    }

    let update = EquipoUpdate {
        nombre: request.nombre,
        tipo: request.tipo,
        marca: request.marca.map(Some),
        modelo: request.modelo.map(Some),
        color_id: request.color_id.map(Some),
        estatus_id: request.estatus_id,
        asignado_a: request.asignado_a.map(Some),
        notas: request.notas.map(Some),
    };

    let equipo = crate::db::equipos::update(&state.db_pool, id, &update)
        .await
        .map_err(|e| AppError(e).into_response())?;

    state
        .audit
        .record(
            NuevaBitacora::new(Accion::EdicionEquipo, Seccion::Equipos, actor.id)
                .elemento(equipo.id)
                .detalles(json!({
                    "numero_serie": equipo.numero_serie,
                    "cambios": cambios,
                })),
        )
        .await;

    Ok(Json(equipo))
}

/// DELETE /api/equipos/:id
pub async fn remove(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, Response> {
    let equipo = crate::db::equipos::find_by_id(&state.db_pool, id)
        .await
        .map_err(|e| AppError(e).into_response())?
        .ok_or_else(|| {
            AppError(ActivosError::NotFound("Equipo no encontrado".into())).into_response()
        })?;

    crate::db::equipos::delete(&state.db_pool, id)
        .await
        .map_err(|e| AppError(e).into_response())?;

    state
        .audit
        .record(
            NuevaBitacora::new(Accion::EliminacionEquipo, Seccion::Equipos, actor.id)
                .elemento(id)
                .detalles(json!({ "numero_serie": equipo.numero_serie })),
        )
        .await;

    Ok(StatusCode::NO_CONTENT)
}
