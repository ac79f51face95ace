//! REST API handlers and router assembly

use crate::AppState;
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared error response type
pub mod error;

/// Authentication: login, logout, session lookup, password reset
pub mod auth;

/// User administration + self-service password/activity routes
pub mod users;

/// Equipment registry
pub mod equipos;

/// Catalog lookups
pub mod catalogos;

/// Audit trail listing
pub mod bitacora;

/// Dashboard statistics
pub mod dashboard;

/// Build the application router.
///
/// Two tiers: the public tier carries the authentication lifecycle and the
/// routes that authenticate by other means (current password / reset
/// token); everything else sits behind the session guard.
pub fn create_app(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/forgot-password", post(auth::forgot_password))
        .route("/api/auth/reset-password", post(auth::reset_password))
        .route("/api/user/password", put(users::change_password))
        .route("/api/user/activity", get(users::activity));

    let protected = Router::new()
        .route("/api/users", get(users::list).post(users::create))
        .route("/api/users/:id", put(users::update).delete(users::remove))
        .route("/api/equipos", get(equipos::list).post(equipos::create))
        .route(
            "/api/equipos/:id",
            get(equipos::get_one)
                .put(equipos::update)
                .delete(equipos::remove),
        )
        .route("/api/catalogos/colores", get(catalogos::colores))
        .route("/api/catalogos/estatus", get(catalogos::estatus))
        .route("/api/catalogos/roles", get(catalogos::roles))
        .route("/api/bitacora", get(bitacora::list))
        .route("/api/dashboard/stats", get(dashboard::stats))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::auth::middleware::require_session,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
