//! Audit trail type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Action kinds recorded in the audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accion {
    /// Successful login
    InicioSesion,
    /// Logout
    CierreSesion,
    /// Password change (current password verified)
    CambioContrasena,
    /// Password reset (token flow)
    RestablecimientoContrasena,
    /// User account created
    CreacionUsuario,
    /// User account edited
    EdicionUsuario,
    /// User account deleted
    EliminacionUsuario,
    /// Equipment registered
    RegistroEquipo,
    /// Equipment edited
    EdicionEquipo,
    /// Equipment deleted
    EliminacionEquipo,
}

impl Accion {
    /// Display string stored in the bitacora
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InicioSesion => "Inicio de Sesión",
            Self::CierreSesion => "Cierre de Sesión",
            Self::CambioContrasena => "Cambio de Contraseña",
            Self::RestablecimientoContrasena => "Restablecimiento de Contraseña",
            Self::CreacionUsuario => "Creación de Usuario",
            Self::EdicionUsuario => "Edición de Usuario",
            Self::EliminacionUsuario => "Eliminación de Usuario",
            Self::RegistroEquipo => "Registro de Equipo",
            Self::EdicionEquipo => "Edición de Equipo",
            Self::EliminacionEquipo => "Eliminación de Equipo",
        }
    }
}

impl std::fmt::Display for Accion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Application sections an action belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seccion {
    /// Login / logout / reset flows
    Autenticacion,
    /// Own-profile operations
    Perfil,
    /// User administration
    Usuarios,
    /// Equipment registry
    Equipos,
}

impl Seccion {
    /// Display string stored in the bitacora
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Autenticacion => "Autenticación",
            Self::Perfil => "Perfil",
            Self::Usuarios => "Usuarios",
            Self::Equipos => "Equipos",
        }
    }
}

impl std::fmt::Display for Seccion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted audit record.
///
/// Created once, never updated or deleted by this service. `id` and
/// `fecha` are assigned by the store at insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bitacora {
    /// Record id (store-assigned)
    pub id: i64,
    /// Action kind, enum-like string
    pub accion: String,
    /// Application section, enum-like string
    pub seccion: String,
    /// Id of the affected element, when the action has one
    pub elemento_id: Option<i64>,
    /// Id of the actor the action is attributed to
    pub autor_id: i64,
    /// Creation timestamp (store-assigned)
    pub fecha: DateTime<Utc>,
    /// Free-form structured detail payload, passed through unvalidated.
    ///
    /// Common keys per action: `usuario` (email), `numero_serie`,
    /// `cambios` (list of changed field names).
    pub detalles: Option<serde_json::Value>,
}

/// Payload for a new audit record
#[derive(Debug, Clone)]
pub struct NuevaBitacora {
    /// Action kind
    pub accion: Accion,
    /// Application section
    pub seccion: Seccion,
    /// Id of the affected element
    pub elemento_id: Option<i64>,
    /// Id of the acting user
    pub autor_id: i64,
    /// Free-form structured detail payload
    pub detalles: Option<serde_json::Value>,
}

impl NuevaBitacora {
    /// Entry with no subject element and no detail payload
    pub fn new(accion: Accion, seccion: Seccion, autor_id: i64) -> Self {
        Self {
            accion,
            seccion,
            elemento_id: None,
            autor_id,
            detalles: None,
        }
    }

    /// Attach the affected element id
    pub fn elemento(mut self, id: i64) -> Self {
        self.elemento_id = Some(id);
        self
    }

    /// Attach the detail payload
    pub fn detalles(mut self, detalles: serde_json::Value) -> Self {
        self.detalles = Some(detalles);
        self
    }
}

/// Query filter for the audit trail listing
#[derive(Debug, Clone, Default)]
pub struct BitacoraFilter {
    /// Filter by author
    pub autor_id: Option<i64>,
    /// Filter by section string
    pub seccion: Option<String>,
    /// Page number (1-based)
    pub page: Option<i64>,
    /// Page size
    pub per_page: Option<i64>,
}
