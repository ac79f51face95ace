//! Authentication data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usuario {
    /// User id
    pub id: i64,
    /// Login email (unique)
    pub email: String,
    /// Display name
    pub nombre: String,
    /// Password hash (bcrypt)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Role id (roles catalog)
    pub rol_id: i64,
    /// Role name, joined from the roles catalog
    pub rol: String,
    /// Whether the account may sign in
    pub activo: bool,
    /// SHA-256 hash of the pending password-reset token
    #[serde(skip_serializing)]
    pub reset_token: Option<String>,
    /// Reset token expiry
    #[serde(skip_serializing)]
    pub reset_token_expira: Option<DateTime<Utc>>,
    /// Last successful login
    pub ultimo_acceso: Option<DateTime<Utc>>,
    /// Creation timestamp
    pub creado_en: DateTime<Utc>,
}

/// JWT claims for a session token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User id (JWT sub claim)
    pub sub: i64,
    /// Login email
    pub email: String,
    /// Display name
    pub nombre: String,
    /// Role name
    pub rol: String,
    /// Expiry (Unix timestamp, JWT exp claim)
    pub exp: usize,
}

/// The resolved identity of a caller.
///
/// Derived solely from a verified session token; never trusted from any
/// other source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// User id
    pub id: i64,
    /// Login email
    pub email: String,
    /// Display name
    pub nombre: String,
    /// Role name
    pub rol: String,
}

impl From<Claims> for Actor {
    fn from(claims: Claims) -> Self {
        Actor {
            id: claims.sub,
            email: claims.email,
            nombre: claims.nombre,
            rol: claims.rol,
        }
    }
}

impl Usuario {
    /// Role name used for administrative access checks
    pub const ROL_ADMINISTRADOR: &'static str = "Administrador";

    /// Whether this account has the administrator role
    pub fn es_administrador(&self) -> bool {
        self.rol == Self::ROL_ADMINISTRADOR
    }
}
