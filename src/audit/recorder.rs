//! Audit recorder
//!
//! Appends audit records around business mutations. Recording is
//! best-effort: a store failure is logged on the operational channel and
//! never aborts the operation being audited.

use crate::audit::types::{Bitacora, NuevaBitacora};
use crate::common::error::ActivosResult;
use sqlx::SqlitePool;

/// Best-effort audit record writer
#[derive(Clone)]
pub struct AuditRecorder {
    pool: SqlitePool,
}

impl AuditRecorder {
    /// Create a recorder over the given pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append one audit record, surfacing store failures.
    ///
    /// The failure path is explicit for callers that want to inspect it;
    /// route handlers normally go through [`record`](Self::record) instead.
    pub async fn try_record(&self, entrada: NuevaBitacora) -> ActivosResult<Bitacora> {
        crate::db::bitacora::insert(&self.pool, &entrada).await
    }

    /// Append one audit record, swallowing store failures.
    ///
    /// Any error is logged to the `bitacora` operational target and
    /// dropped, so the primary operation still completes.
    pub async fn record(&self, entrada: NuevaBitacora) {
        let accion = entrada.accion;
        let autor_id = entrada.autor_id;
        if let Err(e) = self.try_record(entrada).await {
            tracing::error!(
                target: "bitacora",
                accion = accion.as_str(),
                autor_id,
                "Failed to write audit record: {}",
                e
            );
        }
    }
}
