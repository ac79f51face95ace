// Catalog lookups. Read-only from the application's point of view; the
// rows are seeded by migrations.

use crate::common::error::ActivosError;
use serde::Serialize;
use sqlx::SqlitePool;

/// Equipment color
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    /// Color id
    pub id: i64,
    /// Display name
    pub nombre: String,
    /// Hex code for the UI swatch
    pub codigo_hex: Option<String>,
}

/// Equipment status
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Estatus {
    /// Status id
    pub id: i64,
    /// Display name
    pub nombre: String,
}

/// User role
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Rol {
    /// Role id
    pub id: i64,
    /// Display name
    pub nombre: String,
}

/// List all colors
pub async fn list_colores(pool: &SqlitePool) -> Result<Vec<Color>, ActivosError> {
    sqlx::query_as::<_, Color>("SELECT id, nombre, codigo_hex FROM colores ORDER BY nombre")
        .fetch_all(pool)
        .await
        .map_err(|e| ActivosError::Database(format!("Failed to list colors: {}", e)))
}

/// List all statuses
pub async fn list_estatus(pool: &SqlitePool) -> Result<Vec<Estatus>, ActivosError> {
    sqlx::query_as::<_, Estatus>("SELECT id, nombre FROM estatus ORDER BY id")
        .fetch_all(pool)
        .await
        .map_err(|e| ActivosError::Database(format!("Failed to list statuses: {}", e)))
}

/// List all roles
pub async fn list_roles(pool: &SqlitePool) -> Result<Vec<Rol>, ActivosError> {
    sqlx::query_as::<_, Rol>("SELECT id, nombre FROM roles ORDER BY id")
        .fetch_all(pool)
        .await
        .map_err(|e| ActivosError::Database(format!("Failed to list roles: {}", e)))
}

/// Resolve a role id by its name
pub async fn find_rol_id(pool: &SqlitePool, nombre: &str) -> Result<Option<i64>, ActivosError> {
    sqlx::query_scalar("SELECT id FROM roles WHERE nombre = ?")
        .bind(nombre)
        .fetch_optional(pool)
        .await
        .map_err(|e| ActivosError::Database(format!("Failed to find role: {}", e)))
}

/// Resolve a status id by its name
pub async fn find_estatus_id(pool: &SqlitePool, nombre: &str) -> Result<Option<i64>, ActivosError> {
    sqlx::query_scalar("SELECT id FROM estatus WHERE nombre = ?")
        .bind(nombre)
        .fetch_optional(pool)
        .await
        .map_err(|e| ActivosError::Database(format!("Failed to find status: {}", e)))
}
