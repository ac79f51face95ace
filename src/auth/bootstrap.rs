//! First-boot admin account creation
//!
//! Creates the initial administrator from environment variables so a fresh
//! deployment is reachable without touching the database by hand.

use crate::auth::password::hash_password;
use crate::common::error::ActivosError;
use crate::config::get_env;
use crate::db;

/// Create the initial administrator from the environment.
///
/// Runs only when the usuarios table is empty. Requires
/// `ACTIVOS_ADMIN_EMAIL` and `ACTIVOS_ADMIN_PASSWORD`; skips (returning
/// `Ok(None)`) when either is unset or accounts already exist.
pub async fn create_admin_from_env(
    pool: &sqlx::SqlitePool,
) -> Result<Option<String>, ActivosError> {
    if !db::usuarios::is_first_boot(pool).await? {
        return Ok(None);
    }

    let email = match get_env("ACTIVOS_ADMIN_EMAIL") {
        Some(e) => e,
        None => {
            tracing::debug!("ACTIVOS_ADMIN_EMAIL not set, skipping admin bootstrap");
            return Ok(None);
        }
    };
    let password = match get_env("ACTIVOS_ADMIN_PASSWORD") {
        Some(p) => p,
        None => {
            tracing::debug!("ACTIVOS_ADMIN_PASSWORD not set, skipping admin bootstrap");
            return Ok(None);
        }
    };
    let nombre = get_env("ACTIVOS_ADMIN_NOMBRE").unwrap_or_else(|| "Administrador".to_string());

    let password_hash = hash_password(&password)?;
    let rol_id = db::catalogos::find_rol_id(pool, crate::common::auth::Usuario::ROL_ADMINISTRADOR)
        .await?
        .ok_or_else(|| {
            ActivosError::Internal("Administrador role missing from catalog".to_string())
        })?;

    let usuario = db::usuarios::create(pool, &email, &nombre, &password_hash, rol_id).await?;
    tracing::info!("Created admin user from env: email={}", usuario.email);
    Ok(Some(usuario.email))
}
