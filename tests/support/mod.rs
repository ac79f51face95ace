//! Shared helpers for integration tests

use activos::audit::recorder::AuditRecorder;
use activos::common::auth::Usuario;
use activos::{api, AppState};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use sqlx::SqlitePool;
use tower::ServiceExt;

/// Signing secret used by every integration test app
pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Build an app over a fresh in-memory database
pub async fn build_app() -> (Router, SqlitePool) {
    let db_pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run migrations");

    let state = AppState {
        db_pool: db_pool.clone(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        audit: AuditRecorder::new(db_pool.clone()),
    };

    (api::create_app(state), db_pool)
}

/// Seed an account with the given role name
pub async fn seed_usuario_with_rol(
    pool: &SqlitePool,
    email: &str,
    password: &str,
    rol: &str,
) -> Usuario {
    let password_hash = activos::auth::password::hash_password(password).unwrap();
    let rol_id = activos::db::catalogos::find_rol_id(pool, rol)
        .await
        .unwrap()
        .expect("seed rol missing");
    activos::db::usuarios::create(pool, email, "Usuario de Prueba", &password_hash, rol_id)
        .await
        .unwrap()
}

/// Seed a Técnico account
pub async fn seed_usuario(pool: &SqlitePool, email: &str, password: &str) -> Usuario {
    seed_usuario_with_rol(pool, email, password, "Técnico").await
}

/// Seed an Administrador account
pub async fn seed_admin(pool: &SqlitePool, email: &str, password: &str) -> Usuario {
    seed_usuario_with_rol(pool, email, password, "Administrador").await
}

/// Session cookie for an account, signed with the test secret
pub fn session_cookie(usuario: &Usuario) -> String {
    let token = activos::auth::jwt::create_jwt(
        usuario.id,
        &usuario.email,
        &usuario.nombre,
        &usuario.rol,
        TEST_JWT_SECRET,
    )
    .unwrap();
    format!("activos_token={}", token)
}

/// Issue a request and return the response
pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

/// Read a response body as JSON
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Issue a request and assert the status, returning the JSON body
pub async fn request_json(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<serde_json::Value>,
    expected: StatusCode,
) -> serde_json::Value {
    let response = request(app, method, uri, cookie, body).await;
    assert_eq!(response.status(), expected, "unexpected status for {}", uri);
    body_json(response).await
}

/// Count audit records, optionally for one action string
pub async fn bitacora_count(pool: &SqlitePool, accion: Option<&str>) -> i64 {
    match accion {
        Some(accion) => sqlx::query_scalar("SELECT COUNT(*) FROM bitacora WHERE accion = ?")
            .bind(accion)
            .fetch_one(pool)
            .await
            .unwrap(),
        None => sqlx::query_scalar("SELECT COUNT(*) FROM bitacora")
            .fetch_one(pool)
            .await
            .unwrap(),
    }
}
