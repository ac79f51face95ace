//! Audit trail listing API (admin)

use crate::audit::types::{Bitacora, BitacoraFilter};
use crate::common::auth::Actor;
use crate::AppState;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use super::error::AppError;

/// Audit trail listing query
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BitacoraQuery {
    /// Filter by author id
    pub autor_id: Option<i64>,
    /// Filter by section
    pub seccion: Option<String>,
    /// Page number (1-based)
    pub page: Option<i64>,
    /// Page size (default 50)
    pub per_page: Option<i64>,
}

/// Paginated audit trail response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BitacoraPage {
    /// Records in fecha-descending order
    pub registros: Vec<Bitacora>,
    /// Total matching records
    pub total: i64,
    /// Page number
    pub page: i64,
    /// Page size
    pub per_page: i64,
}

/// GET /api/bitacora (admin)
pub async fn list(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Query(query): Query<BitacoraQuery>,
) -> Result<Json<BitacoraPage>, Response> {
    crate::auth::middleware::require_admin(&actor)?;

    let filter = BitacoraFilter {
        autor_id: query.autor_id,
        seccion: query.seccion,
        page: query.page,
        per_page: query.per_page,
    };

    let registros = crate::db::bitacora::query(&state.db_pool, &filter)
        .await
        .map_err(|e| AppError(e).into_response())?;
    let total = crate::db::bitacora::count(&state.db_pool, &filter)
        .await
        .map_err(|e| AppError(e).into_response())?;

    Ok(Json(BitacoraPage {
        registros,
        total,
        page: filter.page.unwrap_or(1).max(1),
        per_page: filter.per_page.unwrap_or(50).max(1),
    }))
}
