//! Catalog lookup API

use crate::db::catalogos::{Color, Estatus, Rol};
use crate::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};

use super::error::AppError;

/// GET /api/catalogos/colores
pub async fn colores(State(state): State<AppState>) -> Result<Json<Vec<Color>>, Response> {
    crate::db::catalogos::list_colores(&state.db_pool)
        .await
        .map(Json)
        .map_err(|e| AppError(e).into_response())
}

/// GET /api/catalogos/estatus
pub async fn estatus(State(state): State<AppState>) -> Result<Json<Vec<Estatus>>, Response> {
    crate::db::catalogos::list_estatus(&state.db_pool)
        .await
        .map(Json)
        .map_err(|e| AppError(e).into_response())
}

/// GET /api/catalogos/roles
pub async fn roles(State(state): State<AppState>) -> Result<Json<Vec<Rol>>, Response> {
    crate::db::catalogos::list_roles(&state.db_pool)
        .await
        .map(Json)
        .map_err(|e| AppError(e).into_response())
}
