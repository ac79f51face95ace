// Equipment registry CRUD

use crate::common::error::ActivosError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// A registered piece of equipment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipo {
    /// Equipment id
    pub id: i64,
    /// Display name
    pub nombre: String,
    /// Equipment type (free text, e.g. "Laptop")
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
    /// Registration timestamp
    pub creado_en: DateTime<Utc>,
}

/// Fields for registering equipment
#[derive(Debug, Clone)]
pub struct NuevoEquipo {
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

/// Partial update; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct EquipoUpdate {
    /// New display name
    pub nombre: Option<String>,
    /// New type
    pub tipo: Option<String>,
    /// New brand
    pub marca: Option<Option<String>>,
    /// New model
    pub modelo: Option<Option<String>>,
    /// New color id
    pub color_id: Option<Option<i64>>,
    /// New status id
    pub estatus_id: Option<i64>,
    /// New assignee
    pub asignado_a: Option<Option<i64>>,
    /// New notes
    pub notas: Option<Option<String>>,
}

/// List filter
#[derive(Debug, Clone, Default)]
pub struct EquipoFilter {
    /// Filter by status
    pub estatus_id: Option<i64>,
    /// Filter by assignee
    pub asignado_a: Option<i64>,
}

const SELECT_EQUIPO: &str = "SELECT id, nombre, tipo, marca, modelo, numero_serie, color_id, \
     estatus_id, asignado_a, notas, creado_en FROM equipos";

/// Register a piece of equipment
///
/// # Returns
/// * `Ok(Equipo)` - the registered row
/// * `Err(ActivosError::Conflict)` - duplicate serial number
pub async fn create(pool: &SqlitePool, nuevo: &NuevoEquipo) -> Result<Equipo, ActivosError> {
    let creado_en = Utc::now();

    let result = sqlx::query(
        "INSERT INTO equipos (nombre, tipo, marca, modelo, numero_serie, color_id, \
         estatus_id, asignado_a, notas, creado_en) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&nuevo.nombre)
    .bind(&nuevo.tipo)
    .bind(&nuevo.marca)
    .bind(&nuevo.modelo)
    .bind(&nuevo.numero_serie)
    .bind(nuevo.color_id)
    .bind(nuevo.estatus_id)
    .bind(nuevo.asignado_a)
    .bind(&nuevo.notas)
    .bind(creado_en.to_rfc3339())
    .execute(pool)
    .await
    .map_err(|e| {
        if e.to_string().contains("UNIQUE constraint failed") {
            ActivosError::Conflict(format!(
                "El número de serie '{}' ya está registrado",
                nuevo.numero_serie
            ))
        } else {
            ActivosError::Database(format!("Failed to create equipment: {}", e))
        }
    })?;

    let id = result.last_insert_rowid();
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| ActivosError::Database("Created equipment not found".to_string()))
}

/// Find equipment by id
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Equipo>, ActivosError> {
    let row = sqlx::query_as::<_, EquipoRow>(&format!("{} WHERE id = ?", SELECT_EQUIPO))
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| ActivosError::Database(format!("Failed to find equipment: {}", e)))?;

    Ok(row.map(|r| r.into_equipo()))
}

/// List equipment, newest first, with optional filters
pub async fn list(pool: &SqlitePool, filter: &EquipoFilter) -> Result<Vec<Equipo>, ActivosError> {
    let mut conditions: Vec<&str> = Vec::new();
    let mut binds: Vec<i64> = Vec::new();

    if let Some(estatus_id) = filter.estatus_id {
        conditions.push("estatus_id = ?");
        binds.push(estatus_id);
    }
    if let Some(asignado_a) = filter.asignado_a {
        conditions.push("asignado_a = ?");
        binds.push(asignado_a);
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    let sql = format!("{}{} ORDER BY creado_en DESC", SELECT_EQUIPO, where_clause);
    let mut query = sqlx::query_as::<_, EquipoRow>(&sql);
    for val in binds {
        query = query.bind(val);
    }

    let rows = query
        .fetch_all(pool)
        .await
        .map_err(|e| ActivosError::Database(format!("Failed to list equipment: {}", e)))?;

    Ok(rows.into_iter().map(|r| r.into_equipo()).collect())
}

/// Update equipment fields
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    cambios: &EquipoUpdate,
) -> Result<Equipo, ActivosError> {
    let current = find_by_id(pool, id)
        .await?
        .ok_or_else(|| ActivosError::NotFound("Equipo no encontrado".to_string()))?;

    let nombre = cambios.nombre.clone().unwrap_or(current.nombre);
    let tipo = cambios.tipo.clone().unwrap_or(current.tipo);
    let marca = cambios.marca.clone().unwrap_or(current.marca);
    let modelo = cambios.modelo.clone().unwrap_or(current.modelo);
    let color_id = cambios.color_id.unwrap_or(current.color_id);
    let estatus_id = cambios.estatus_id.unwrap_or(current.estatus_id);
    let asignado_a = cambios.asignado_a.unwrap_or(current.asignado_a);
    let notas = cambios.notas.clone().unwrap_or(current.notas);

    sqlx::query(
        "UPDATE equipos SET nombre = ?, tipo = ?, marca = ?, modelo = ?, color_id = ?, \
         estatus_id = ?, asignado_a = ?, notas = ? WHERE id = ?",
    )
    .bind(&nombre)
    .bind(&tipo)
    .bind(&marca)
    .bind(&modelo)
    .bind(color_id)
    .bind(estatus_id)
    .bind(asignado_a)
    .bind(&notas)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| ActivosError::Database(format!("Failed to update equipment: {}", e)))?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| ActivosError::Database("Updated equipment not found".to_string()))
}

/// Delete equipment
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), ActivosError> {
    sqlx::query("DELETE FROM equipos WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| ActivosError::Database(format!("Failed to delete equipment: {}", e)))?;

    Ok(())
}

/// Total equipment count
pub async fn count(pool: &SqlitePool) -> Result<i64, ActivosError> {
    sqlx::query_scalar("SELECT COUNT(*) FROM equipos")
        .fetch_one(pool)
        .await
        .map_err(|e| ActivosError::Database(format!("Failed to count equipment: {}", e)))
}

/// Equipment count per status name
pub async fn count_by_estatus(pool: &SqlitePool) -> Result<Vec<(String, i64)>, ActivosError> {
    let rows: Vec<(String, i64)> = sqlx::query_as(
        "SELECT s.nombre, COUNT(e.id) AS cnt FROM estatus s \
         LEFT JOIN equipos e ON e.estatus_id = s.id \
         GROUP BY s.id ORDER BY s.id",
    )
    .fetch_all(pool)
    .await
    .map_err(|e| ActivosError::Database(format!("Failed to count by status: {}", e)))?;
    Ok(rows)
}

// Internal row type for SQLite fetches
#[derive(sqlx::FromRow)]
struct EquipoRow {
    id: i64,
    nombre: String,
    tipo: String,
    marca: Option<String>,
    modelo: Option<String>,
    numero_serie: String,
    color_id: Option<i64>,
    estatus_id: i64,
    asignado_a: Option<i64>,
    notas: Option<String>,
    creado_en: String,
}

impl EquipoRow {
    fn into_equipo(self) -> Equipo {
        let creado_en = DateTime::parse_from_rfc3339(&self.creado_en)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_default();
        Equipo {
            id: self.id,
            nombre: self.nombre,
            tipo: self.tipo,
            marca: self.marca,
            modelo: self.modelo,
            numero_serie: self.numero_serie,
            color_id: self.color_id,
            estatus_id: self.estatus_id,
            asignado_a: self.asignado_a,
            notas: self.notas,
            creado_en,
        }
    }
}
