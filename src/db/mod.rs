//! Database access layer
//!
//! SQLite-backed persistence with hand-written SQL.

/// Database migrations
pub mod migrations;

/// User accounts
pub mod usuarios;

/// Catalog lookups (colores, estatus, roles)
pub mod catalogos;

/// Equipment registry
pub mod equipos;

/// Audit trail storage
pub mod bitacora;
