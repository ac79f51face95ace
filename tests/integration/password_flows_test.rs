//! Integration tests: password reset and password change flows

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;

use crate::support;

#[tokio::test]
async fn reset_password_missing_fields_is_400() {
    let (app, pool) = support::build_app().await;

    let body = support::request_json(
        &app,
        "POST",
        "/api/auth/reset-password",
        None,
        Some(json!({ "token": "abc" })),
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(body["error"], "Missing required fields");
    assert_eq!(support::bitacora_count(&pool, None).await, 0);
}

#[tokio::test]
async fn reset_password_unknown_token_is_400_without_audit() {
    let (app, pool) = support::build_app().await;
    support::seed_usuario(&pool, "ana@example.com", "vieja123").await;

    let body = support::request_json(
        &app,
        "POST",
        "/api/auth/reset-password",
        None,
        Some(json!({ "token": "never-issued", "newPassword": "nueva123" })),
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(body["error"], "Invalid or expired token");
    assert_eq!(support::bitacora_count(&pool, None).await, 0);
}

#[tokio::test]
async fn reset_password_expired_token_is_400_without_audit() {
    let (app, pool) = support::build_app().await;
    let usuario = support::seed_usuario(&pool, "ana@example.com", "vieja123").await;

    let token = "expired-token-value";
    let token_hash = activos::db::usuarios::hash_token(token);
    activos::db::usuarios::set_reset_token(
        &pool,
        usuario.id,
        &token_hash,
        Utc::now() - Duration::hours(2),
    )
    .await
    .unwrap();

    let body = support::request_json(
        &app,
        "POST",
        "/api/auth/reset-password",
        None,
        Some(json!({ "token": token, "newPassword": "nueva123" })),
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(body["error"], "Token expired");
    assert_eq!(support::bitacora_count(&pool, None).await, 0);
}

#[tokio::test]
async fn reset_password_success_updates_hash_and_audits_once() {
    let (app, pool) = support::build_app().await;
    let usuario = support::seed_usuario(&pool, "ana@example.com", "vieja123").await;

    let token = "valid-token-value";
    let token_hash = activos::db::usuarios::hash_token(token);
    activos::db::usuarios::set_reset_token(
        &pool,
        usuario.id,
        &token_hash,
        Utc::now() + Duration::hours(1),
    )
    .await
    .unwrap();

    let body = support::request_json(
        &app,
        "POST",
        "/api/auth/reset-password",
        None,
        Some(json!({ "token": token, "newPassword": "nueva123" })),
        StatusCode::OK,
    )
    .await;
    assert!(body["message"].is_string());

    // hash replaced: old password rejected, new password accepted
    let refreshed = activos::db::usuarios::find_by_id(&pool, usuario.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!activos::auth::password::verify_password("vieja123", &refreshed.password_hash)
        .unwrap());
    assert!(activos::auth::password::verify_password("nueva123", &refreshed.password_hash)
        .unwrap());

    // token consumed
    assert!(refreshed.reset_token.is_none());

    // exactly one audit record, attributed to the account
    assert_eq!(
        support::bitacora_count(&pool, Some("Restablecimiento de Contraseña")).await,
        1
    );
    let records = activos::db::bitacora::recientes_por_autor(&pool, usuario.id, 5)
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].accion, "Restablecimiento de Contraseña");

    // the consumed token cannot be replayed
    let replay = support::request(
        &app,
        "POST",
        "/api/auth/reset-password",
        None,
        Some(json!({ "token": token, "newPassword": "otra456" })),
    )
    .await;
    assert_eq!(replay.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn forgot_password_is_generic_for_unknown_email() {
    let (app, pool) = support::build_app().await;
    support::seed_usuario(&pool, "ana@example.com", "secreta123").await;

    let known = support::request_json(
        &app,
        "POST",
        "/api/auth/forgot-password",
        None,
        Some(json!({ "email": "ana@example.com" })),
        StatusCode::OK,
    )
    .await;
    let unknown = support::request_json(
        &app,
        "POST",
        "/api/auth/forgot-password",
        None,
        Some(json!({ "email": "nadie@example.com" })),
        StatusCode::OK,
    )
    .await;
    assert_eq!(known["message"], unknown["message"]);

    // only the real account got a token
    let usuario = activos::db::usuarios::find_by_email(&pool, "ana@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(usuario.reset_token.is_some());
}

#[tokio::test]
async fn change_password_missing_fields_is_400() {
    let (app, pool) = support::build_app().await;
    support::seed_usuario(&pool, "ana@example.com", "vieja123").await;

    let body = support::request_json(
        &app,
        "PUT",
        "/api/user/password",
        None,
        Some(json!({ "id": 1, "currentPassword": "vieja123" })),
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(body["error"], "Missing required fields");
    assert_eq!(support::bitacora_count(&pool, None).await, 0);
}

#[tokio::test]
async fn change_password_unknown_user_is_404() {
    let (app, pool) = support::build_app().await;

    let body = support::request_json(
        &app,
        "PUT",
        "/api/user/password",
        None,
        Some(json!({ "id": 999, "currentPassword": "x", "newPassword": "y" })),
        StatusCode::NOT_FOUND,
    )
    .await;
    assert_eq!(body["error"], "User not found");
    assert_eq!(support::bitacora_count(&pool, None).await, 0);
}

#[tokio::test]
async fn change_password_wrong_current_is_400_without_audit() {
    let (app, pool) = support::build_app().await;
    let usuario = support::seed_usuario(&pool, "ana@example.com", "vieja123").await;

    let body = support::request_json(
        &app,
        "PUT",
        "/api/user/password",
        None,
        Some(json!({
            "id": usuario.id,
            "currentPassword": "incorrecta",
            "newPassword": "nueva123",
        })),
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(body["error"], "Current password is incorrect");
    assert_eq!(support::bitacora_count(&pool, None).await, 0);
}

#[tokio::test]
async fn change_password_success_audits_with_autor_id() {
    let (app, pool) = support::build_app().await;
    let usuario = support::seed_usuario(&pool, "ana@example.com", "vieja123").await;

    support::request_json(
        &app,
        "PUT",
        "/api/user/password",
        None,
        Some(json!({
            "id": usuario.id,
            "currentPassword": "vieja123",
            "newPassword": "nueva123",
        })),
        StatusCode::OK,
    )
    .await;

    let refreshed = activos::db::usuarios::find_by_id(&pool, usuario.id)
        .await
        .unwrap()
        .unwrap();
    assert!(activos::auth::password::verify_password("nueva123", &refreshed.password_hash)
        .unwrap());

    assert_eq!(
        support::bitacora_count(&pool, Some("Cambio de Contraseña")).await,
        1
    );
    let records = activos::db::bitacora::recientes_por_autor(&pool, usuario.id, 5)
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].accion, "Cambio de Contraseña");
    assert_eq!(records[0].autor_id, usuario.id);
    assert_eq!(
        records[0].detalles.as_ref().unwrap()["usuario"],
        "ana@example.com"
    );
}
