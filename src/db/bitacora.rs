//! Audit trail storage
//!
//! Append and query only; rows are never updated or deleted here.

use crate::audit::types::{Bitacora, BitacoraFilter, NuevaBitacora};
use crate::common::error::{ActivosError, ActivosResult};
use chrono::Utc;
use sqlx::SqlitePool;

const SELECT_BITACORA: &str =
    "SELECT id, accion, seccion, elemento_id, autor_id, fecha, detalles FROM bitacora";

/// Append one audit record; the store assigns id and fecha
pub async fn insert(pool: &SqlitePool, entrada: &NuevaBitacora) -> ActivosResult<Bitacora> {
    let fecha = Utc::now();
    let detalles = entrada
        .detalles
        .as_ref()
        .map(|v| {
            serde_json::to_string(v)
                .map_err(|e| ActivosError::Database(format!("Failed to encode detalles: {}", e)))
        })
        .transpose()?;

    let result = sqlx::query(
        "INSERT INTO bitacora (accion, seccion, elemento_id, autor_id, fecha, detalles) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(entrada.accion.as_str())
    .bind(entrada.seccion.as_str())
    .bind(entrada.elemento_id)
    .bind(entrada.autor_id)
    .bind(fecha.to_rfc3339())
    .bind(&detalles)
    .execute(pool)
    .await
    .map_err(|e| ActivosError::Database(format!("Failed to insert audit record: {}", e)))?;

    Ok(Bitacora {
        id: result.last_insert_rowid(),
        accion: entrada.accion.as_str().to_string(),
        seccion: entrada.seccion.as_str().to_string(),
        elemento_id: entrada.elemento_id,
        autor_id: entrada.autor_id,
        fecha,
        detalles: entrada.detalles.clone(),
    })
}

/// The most recent records for one author, fecha descending
pub async fn recientes_por_autor(
    pool: &SqlitePool,
    autor_id: i64,
    limit: i64,
) -> ActivosResult<Vec<Bitacora>> {
    let rows = sqlx::query_as::<_, BitacoraRow>(&format!(
        "{} WHERE autor_id = ? ORDER BY fecha DESC, id DESC LIMIT ?",
        SELECT_BITACORA
    ))
    .bind(autor_id)
    .bind(limit)
    .fetch_all(pool)
    .await
    .map_err(|e| ActivosError::Database(format!("Failed to query audit records: {}", e)))?;

    rows.into_iter().map(Bitacora::try_from).collect()
}

/// The most recent records across all authors
pub async fn recientes(pool: &SqlitePool, limit: i64) -> ActivosResult<Vec<Bitacora>> {
    let rows = sqlx::query_as::<_, BitacoraRow>(&format!(
        "{} ORDER BY fecha DESC, id DESC LIMIT ?",
        SELECT_BITACORA
    ))
    .bind(limit)
    .fetch_all(pool)
    .await
    .map_err(|e| ActivosError::Database(format!("Failed to query audit records: {}", e)))?;

    rows.into_iter().map(Bitacora::try_from).collect()
}

/// Filtered, paginated query, fecha descending
pub async fn query(pool: &SqlitePool, filter: &BitacoraFilter) -> ActivosResult<Vec<Bitacora>> {
    let (where_clause, bind_values) = build_where_clause(filter);
    let page = filter.page.unwrap_or(1).max(1);
    let per_page = filter.per_page.unwrap_or(50).max(1);
    let offset = (page - 1) * per_page;

    let sql = format!(
        "{} {} ORDER BY fecha DESC, id DESC LIMIT ? OFFSET ?",
        SELECT_BITACORA, where_clause
    );

    let mut query = sqlx::query_as::<_, BitacoraRow>(&sql);
    for val in &bind_values {
        query = query.bind(val.as_str());
    }
    query = query.bind(per_page).bind(offset);

    let rows = query
        .fetch_all(pool)
        .await
        .map_err(|e| ActivosError::Database(format!("Failed to query audit records: {}", e)))?;

    rows.into_iter().map(Bitacora::try_from).collect()
}

/// Record count for a filter
pub async fn count(pool: &SqlitePool, filter: &BitacoraFilter) -> ActivosResult<i64> {
    let (where_clause, bind_values) = build_where_clause(filter);
    let sql = format!("SELECT COUNT(*) FROM bitacora {}", where_clause);

    let mut query = sqlx::query_scalar::<_, i64>(&sql);
    for val in &bind_values {
        query = query.bind(val.as_str());
    }

    query
        .fetch_one(pool)
        .await
        .map_err(|e| ActivosError::Database(format!("Failed to count audit records: {}", e)))
}

fn build_where_clause(filter: &BitacoraFilter) -> (String, Vec<String>) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_values: Vec<String> = Vec::new();

    if let Some(autor_id) = filter.autor_id {
        conditions.push("autor_id = ?".to_string());
        bind_values.push(autor_id.to_string());
    }

    if let Some(ref seccion) = filter.seccion {
        conditions.push("seccion = ?".to_string());
        bind_values.push(seccion.clone());
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values)
}

// Internal row type for SQLite fetches
#[derive(Debug, sqlx::FromRow)]
struct BitacoraRow {
    id: i64,
    accion: String,
    seccion: String,
    elemento_id: Option<i64>,
    autor_id: i64,
    fecha: String,
    detalles: Option<String>,
}

impl TryFrom<BitacoraRow> for Bitacora {
    type Error = ActivosError;

    fn try_from(row: BitacoraRow) -> Result<Self, Self::Error> {
        let fecha = chrono::DateTime::parse_from_rfc3339(&row.fecha)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| ActivosError::Database(format!("Failed to parse fecha: {}", e)))?;

        let detalles = row
            .detalles
            .as_deref()
            .map(|s| {
                serde_json::from_str(s).map_err(|e| {
                    ActivosError::Database(format!("Failed to parse detalles: {}", e))
                })
            })
            .transpose()?;

        Ok(Bitacora {
            id: row.id,
            accion: row.accion,
            seccion: row.seccion,
            elemento_id: row.elemento_id,
            autor_id: row.autor_id,
            fecha,
            detalles,
        })
    }
}
