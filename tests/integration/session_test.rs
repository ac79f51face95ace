//! Integration tests: session lifecycle and /api/auth/me

use axum::http::{header, StatusCode};
use serde_json::json;

use crate::support;

#[tokio::test]
async fn me_without_cookie_is_200_null() {
    let (app, _pool) = support::build_app().await;

    let body = support::request_json(
        &app,
        "GET",
        "/api/auth/me",
        None,
        None,
        StatusCode::OK,
    )
    .await;
    assert!(body["user"].is_null());
}

#[tokio::test]
async fn me_with_garbage_cookie_is_200_null() {
    let (app, _pool) = support::build_app().await;

    let body = support::request_json(
        &app,
        "GET",
        "/api/auth/me",
        Some("activos_token=not.a.token"),
        None,
        StatusCode::OK,
    )
    .await;
    assert!(body["user"].is_null());
}

#[tokio::test]
async fn me_with_valid_session_returns_actor() {
    let (app, pool) = support::build_app().await;
    let usuario = support::seed_usuario(&pool, "ana@example.com", "secreta123").await;
    let cookie = support::session_cookie(&usuario);

    let body = support::request_json(
        &app,
        "GET",
        "/api/auth/me",
        Some(&cookie),
        None,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["user"]["id"], usuario.id);
    assert_eq!(body["user"]["email"], "ana@example.com");
    assert_eq!(body["user"]["rol"], "Técnico");
}

#[tokio::test]
async fn me_with_deactivated_account_is_null() {
    let (app, pool) = support::build_app().await;
    let usuario = support::seed_usuario(&pool, "ana@example.com", "secreta123").await;
    let cookie = support::session_cookie(&usuario);

    sqlx::query("UPDATE usuarios SET activo = 0 WHERE id = ?")
        .bind(usuario.id)
        .execute(&pool)
        .await
        .unwrap();

    let body = support::request_json(
        &app,
        "GET",
        "/api/auth/me",
        Some(&cookie),
        None,
        StatusCode::OK,
    )
    .await;
    assert!(body["user"].is_null());
}

#[tokio::test]
async fn login_sets_cookie_and_audits() {
    let (app, pool) = support::build_app().await;
    let usuario = support::seed_usuario(&pool, "ana@example.com", "secreta123").await;

    let response = support::request(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "ana@example.com", "password": "secreta123" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
        .expect("login should set the session cookie");
    assert!(set_cookie.starts_with("activos_token="));
    assert!(set_cookie.contains("HttpOnly"));

    let body = support::body_json(response).await;
    assert_eq!(body["user"]["id"], usuario.id);

    assert_eq!(
        support::bitacora_count(&pool, Some("Inicio de Sesión")).await,
        1
    );

    // the issued cookie works against /api/auth/me
    let cookie = set_cookie.split(';').next().unwrap().to_string();
    let me = support::request_json(
        &app,
        "GET",
        "/api/auth/me",
        Some(&cookie),
        None,
        StatusCode::OK,
    )
    .await;
    assert_eq!(me["user"]["email"], "ana@example.com");
}

#[tokio::test]
async fn login_with_wrong_password_is_401_without_audit() {
    let (app, pool) = support::build_app().await;
    support::seed_usuario(&pool, "ana@example.com", "secreta123").await;

    let body = support::request_json(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "ana@example.com", "password": "incorrecta" })),
        StatusCode::UNAUTHORIZED,
    )
    .await;
    assert_eq!(body["error"], "Credenciales inválidas");
    assert_eq!(support::bitacora_count(&pool, None).await, 0);
}

#[tokio::test]
async fn login_with_unknown_email_is_401_with_same_message() {
    let (app, _pool) = support::build_app().await;

    let body = support::request_json(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "nadie@example.com", "password": "x" })),
        StatusCode::UNAUTHORIZED,
    )
    .await;
    assert_eq!(body["error"], "Credenciales inválidas");
}

#[tokio::test]
async fn login_inactive_account_is_401() {
    let (app, pool) = support::build_app().await;
    let usuario = support::seed_usuario(&pool, "ana@example.com", "secreta123").await;
    sqlx::query("UPDATE usuarios SET activo = 0 WHERE id = ?")
        .bind(usuario.id)
        .execute(&pool)
        .await
        .unwrap();

    let response = support::request(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "ana@example.com", "password": "secreta123" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_missing_fields_is_400() {
    let (app, _pool) = support::build_app().await;

    let response = support::request(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "ana@example.com" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn logout_clears_cookie_and_audits() {
    let (app, pool) = support::build_app().await;
    let usuario = support::seed_usuario(&pool, "ana@example.com", "secreta123").await;
    let cookie = support::session_cookie(&usuario);

    let response = support::request(&app, "POST", "/api/auth/logout", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(set_cookie.contains("Max-Age=0"));

    assert_eq!(
        support::bitacora_count(&pool, Some("Cierre de Sesión")).await,
        1
    );
}

#[tokio::test]
async fn anonymous_logout_clears_without_audit() {
    let (app, pool) = support::build_app().await;

    let response = support::request(&app, "POST", "/api/auth/logout", None, None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(support::bitacora_count(&pool, None).await, 0);
}
