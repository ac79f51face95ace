//! Integration tests: equipment registry, catalogs and dashboard

use axum::http::StatusCode;
use serde_json::json;

use crate::support;

async fn estatus_id(pool: &sqlx::SqlitePool, nombre: &str) -> i64 {
    activos::db::catalogos::find_estatus_id(pool, nombre)
        .await
        .unwrap()
        .unwrap()
}

#[tokio::test]
async fn equipos_require_session() {
    let (app, _pool) = support::build_app().await;

    let response = support::request(&app, "GET", "/api/equipos", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = support::request(
        &app,
        "GET",
        "/api/equipos",
        Some("activos_token=bogus"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn equipo_create_audits_and_rejects_duplicate_serial() {
    let (app, pool) = support::build_app().await;
    let usuario = support::seed_usuario(&pool, "tec@example.com", "secreta123").await;
    let cookie = support::session_cookie(&usuario);
    let disponible = estatus_id(&pool, "Disponible").await;

    let payload = json!({
        "nombre": "Laptop Dev",
        "tipo": "Laptop",
        "marca": "Lenovo",
        "numeroSerie": "SN-100",
        "estatusId": disponible,
    });

    let body = support::request_json(
        &app,
        "POST",
        "/api/equipos",
        Some(&cookie),
        Some(payload.clone()),
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(body["numeroSerie"], "SN-100");
    let equipo_id = body["id"].as_i64().unwrap();

    assert_eq!(
        support::bitacora_count(&pool, Some("Registro de Equipo")).await,
        1
    );
    let records = activos::db::bitacora::recientes_por_autor(&pool, usuario.id, 5)
        .await
        .unwrap();
    assert_eq!(records[0].elemento_id, Some(equipo_id));
    assert_eq!(records[0].detalles.as_ref().unwrap()["numero_serie"], "SN-100");

    // duplicate serial -> 409, no extra audit record
    let response =
        support::request(&app, "POST", "/api/equipos", Some(&cookie), Some(payload)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        support::bitacora_count(&pool, Some("Registro de Equipo")).await,
        1
    );
}

#[tokio::test]
async fn equipo_list_filters_by_estatus() {
    let (app, pool) = support::build_app().await;
    let usuario = support::seed_usuario(&pool, "tec@example.com", "secreta123").await;
    let cookie = support::session_cookie(&usuario);
    let disponible = estatus_id(&pool, "Disponible").await;
    let baja = estatus_id(&pool, "Baja").await;

    for (serie, estatus) in [("SN-1", disponible), ("SN-2", disponible), ("SN-3", baja)] {
        support::request_json(
            &app,
            "POST",
            "/api/equipos",
            Some(&cookie),
            Some(json!({
                "nombre": "Equipo",
                "tipo": "Laptop",
                "numeroSerie": serie,
                "estatusId": estatus,
            })),
            StatusCode::CREATED,
        )
        .await;
    }

    let all = support::request_json(
        &app,
        "GET",
        "/api/equipos",
        Some(&cookie),
        None,
        StatusCode::OK,
    )
    .await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let filtered = support::request_json(
        &app,
        "GET",
        &format!("/api/equipos?estatusId={}", disponible),
        Some(&cookie),
        None,
        StatusCode::OK,
    )
    .await;
    assert_eq!(filtered.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn equipo_update_and_delete_audit() {
    let (app, pool) = support::build_app().await;
    let usuario = support::seed_usuario(&pool, "tec@example.com", "secreta123").await;
    let cookie = support::session_cookie(&usuario);
    let disponible = estatus_id(&pool, "Disponible").await;
    let asignado = estatus_id(&pool, "Asignado").await;

    let created = support::request_json(
        &app,
        "POST",
        "/api/equipos",
        Some(&cookie),
        Some(json!({
            "nombre": "Monitor",
            "tipo": "Monitor",
            "numeroSerie": "SN-200",
            "estatusId": disponible,
        })),
        StatusCode::CREATED,
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let updated = support::request_json(
        &app,
        "PUT",
        &format!("/api/equipos/{}", id),
        Some(&cookie),
        Some(json!({ "estatusId": asignado, "asignadoA": usuario.id })),
        StatusCode::OK,
    )
    .await;
    assert_eq!(updated["estatusId"], asignado);
    assert_eq!(updated["asignadoA"], usuario.id);
    assert_eq!(
        support::bitacora_count(&pool, Some("Edición de Equipo")).await,
        1
    );

    let response = support::request(
        &app,
        "DELETE",
        &format!("/api/equipos/{}", id),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        support::bitacora_count(&pool, Some("Eliminación de Equipo")).await,
        1
    );

    let response = support::request(
        &app,
        "GET",
        &format!("/api/equipos/{}", id),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn catalogos_are_seeded() {
    let (app, pool) = support::build_app().await;
    let usuario = support::seed_usuario(&pool, "tec@example.com", "secreta123").await;
    let cookie = support::session_cookie(&usuario);

    let colores = support::request_json(
        &app,
        "GET",
        "/api/catalogos/colores",
        Some(&cookie),
        None,
        StatusCode::OK,
    )
    .await;
    assert_eq!(colores.as_array().unwrap().len(), 5);

    let estatus = support::request_json(
        &app,
        "GET",
        "/api/catalogos/estatus",
        Some(&cookie),
        None,
        StatusCode::OK,
    )
    .await;
    assert_eq!(estatus.as_array().unwrap().len(), 4);

    let roles = support::request_json(
        &app,
        "GET",
        "/api/catalogos/roles",
        Some(&cookie),
        None,
        StatusCode::OK,
    )
    .await;
    assert_eq!(roles.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn dashboard_stats_aggregate() {
    let (app, pool) = support::build_app().await;
    let usuario = support::seed_usuario(&pool, "tec@example.com", "secreta123").await;
    let cookie = support::session_cookie(&usuario);
    let disponible = estatus_id(&pool, "Disponible").await;

    support::request_json(
        &app,
        "POST",
        "/api/equipos",
        Some(&cookie),
        Some(json!({
            "nombre": "Laptop",
            "tipo": "Laptop",
            "numeroSerie": "SN-300",
            "estatusId": disponible,
        })),
        StatusCode::CREATED,
    )
    .await;

    let stats = support::request_json(
        &app,
        "GET",
        "/api/dashboard/stats",
        Some(&cookie),
        None,
        StatusCode::OK,
    )
    .await;
    assert_eq!(stats["totalUsuarios"], 1);
    assert_eq!(stats["totalEquipos"], 1);

    let por_estatus = stats["equiposPorEstatus"].as_array().unwrap();
    assert_eq!(por_estatus.len(), 4);
    let disponibles = por_estatus
        .iter()
        .find(|e| e["estatus"] == "Disponible")
        .unwrap();
    assert_eq!(disponibles["cantidad"], 1);

    // the equipment registration shows up as recent activity
    let actividad = stats["actividadReciente"].as_array().unwrap();
    assert!(actividad
        .iter()
        .any(|r| r["accion"] == "Registro de Equipo"));
}
