//! Dashboard statistics API

use crate::audit::types::Bitacora;
use crate::AppState;
use axum::{extract::State, response::IntoResponse, response::Response, Json};
use serde::Serialize;

use super::error::AppError;

/// Recent audit records shown on the dashboard
const ACTIVIDAD_RECIENTE_LIMIT: i64 = 10;

/// Equipment count for one status
#[derive(Debug, Serialize)]
pub struct EstatusCount {
    /// Status name
    pub estatus: String,
    /// Equipment in that status
    pub cantidad: i64,
}

/// Dashboard statistics
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Active accounts
    pub total_usuarios: i64,
    /// Registered equipment
    pub total_equipos: i64,
    /// Equipment grouped by status
    pub equipos_por_estatus: Vec<EstatusCount>,
    /// Latest audit records
    pub actividad_reciente: Vec<Bitacora>,
}

/// GET /api/dashboard/stats
pub async fn stats(State(state): State<AppState>) -> Result<Json<DashboardStats>, Response> {
    let total_usuarios = crate::db::usuarios::count_activos(&state.db_pool)
        .await
        .map_err(|e| AppError(e).into_response())?;
    let total_equipos = crate::db::equipos::count(&state.db_pool)
        .await
        .map_err(|e| AppError(e).into_response())?;
    let equipos_por_estatus = crate::db::equipos::count_by_estatus(&state.db_pool)
        .await
        .map_err(|e| AppError(e).into_response())?
        .into_iter()
        .map(|(estatus, cantidad)| EstatusCount { estatus, cantidad })
        .collect();
    let actividad_reciente =
        crate::db::bitacora::recientes(&state.db_pool, ACTIVIDAD_RECIENTE_LIMIT)
            .await
            .map_err(|e| AppError(e).into_response())?;

    Ok(Json(DashboardStats {
        total_usuarios,
        total_equipos,
        equipos_por_estatus,
        actividad_reciente,
    }))
}
