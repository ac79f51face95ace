//! Activos
//!
//! Internal asset, equipment and personnel management service: session
//! authentication, user administration, equipment registry, catalog
//! lookups, dashboard statistics and an append-only audit trail
//! (bitácora).

#![warn(missing_docs)]

/// Shared types (data model, errors)
pub mod common;

/// REST API handlers
pub mod api;

/// Authentication and session verification
pub mod auth;

/// Audit trail (bitácora)
pub mod audit;

/// Database access
pub mod db;

/// Configuration (environment helpers)
pub mod config;

/// Logging initialization
pub mod logging;

/// Server startup and shutdown handling
pub mod server;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db_pool: sqlx::SqlitePool,
    /// Session-token signing secret
    pub jwt_secret: String,
    /// Best-effort audit recorder
    pub audit: audit::recorder::AuditRecorder,
}
