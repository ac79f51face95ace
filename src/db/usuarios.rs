// User account CRUD

use crate::common::auth::Usuario;
use crate::common::error::ActivosError;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;

const SELECT_USUARIO: &str = "SELECT u.id, u.email, u.nombre, u.password_hash, u.rol_id, \
     r.nombre AS rol, u.activo, u.reset_token, u.reset_token_expira, \
     u.ultimo_acceso, u.creado_en \
     FROM usuarios u JOIN roles r ON u.rol_id = r.id";

/// Hash a reset token with SHA-256 (hex)
///
/// Only the hash is persisted; the plaintext token exists solely in the
/// delivery path.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Create a user account
///
/// # Returns
/// * `Ok(Usuario)` - the created account
/// * `Err(ActivosError::Conflict)` - email already registered
pub async fn create(
    pool: &SqlitePool,
    email: &str,
    nombre: &str,
    password_hash: &str,
    rol_id: i64,
) -> Result<Usuario, ActivosError> {
    let creado_en = Utc::now();

    let result = sqlx::query(
        "INSERT INTO usuarios (email, nombre, password_hash, rol_id, activo, creado_en)
         VALUES (?, ?, ?, ?, 1, ?)",
    )
    .bind(email)
    .bind(nombre)
    .bind(password_hash)
    .bind(rol_id)
    .bind(creado_en.to_rfc3339())
    .execute(pool)
    .await
    .map_err(|e| {
        if e.to_string().contains("UNIQUE constraint failed") {
            ActivosError::Conflict(format!("El correo '{}' ya está registrado", email))
        } else {
            ActivosError::Database(format!("Failed to create user: {}", e))
        }
    })?;

    let id = result.last_insert_rowid();
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| ActivosError::Database("Created user not found".to_string()))
}

/// Find a user by id
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Usuario>, ActivosError> {
    let row = sqlx::query_as::<_, UsuarioRow>(&format!("{} WHERE u.id = ?", SELECT_USUARIO))
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| ActivosError::Database(format!("Failed to find user: {}", e)))?;

    Ok(row.map(|r| r.into_usuario()))
}

/// Find a user by login email
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Usuario>, ActivosError> {
    let row = sqlx::query_as::<_, UsuarioRow>(&format!("{} WHERE u.email = ?", SELECT_USUARIO))
        .bind(email)
        .fetch_optional(pool)
        .await
        .map_err(|e| ActivosError::Database(format!("Failed to find user: {}", e)))?;

    Ok(row.map(|r| r.into_usuario()))
}

/// List all accounts, newest first
pub async fn list(pool: &SqlitePool) -> Result<Vec<Usuario>, ActivosError> {
    let rows =
        sqlx::query_as::<_, UsuarioRow>(&format!("{} ORDER BY u.creado_en DESC", SELECT_USUARIO))
            .fetch_all(pool)
            .await
            .map_err(|e| ActivosError::Database(format!("Failed to list users: {}", e)))?;

    Ok(rows.into_iter().map(|r| r.into_usuario()).collect())
}

/// Update account fields; `None` leaves a field untouched
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    email: Option<&str>,
    nombre: Option<&str>,
    rol_id: Option<i64>,
    activo: Option<bool>,
) -> Result<Usuario, ActivosError> {
    let current = find_by_id(pool, id)
        .await?
        .ok_or_else(|| ActivosError::NotFound("Usuario no encontrado".to_string()))?;

    let new_email = email.unwrap_or(&current.email);
    let new_nombre = nombre.unwrap_or(&current.nombre);
    let new_rol_id = rol_id.unwrap_or(current.rol_id);
    let new_activo = activo.unwrap_or(current.activo);

    sqlx::query("UPDATE usuarios SET email = ?, nombre = ?, rol_id = ?, activo = ? WHERE id = ?")
        .bind(new_email)
        .bind(new_nombre)
        .bind(new_rol_id)
        .bind(new_activo as i32)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE constraint failed") {
                ActivosError::Conflict(format!("El correo '{}' ya está registrado", new_email))
            } else {
                ActivosError::Database(format!("Failed to update user: {}", e))
            }
        })?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| ActivosError::Database("Updated user not found".to_string()))
}

/// Replace the password hash
pub async fn update_password(
    pool: &SqlitePool,
    id: i64,
    password_hash: &str,
) -> Result<(), ActivosError> {
    sqlx::query("UPDATE usuarios SET password_hash = ? WHERE id = ?")
        .bind(password_hash)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| ActivosError::Database(format!("Failed to update password: {}", e)))?;

    Ok(())
}

/// Stamp the last successful login
pub async fn update_ultimo_acceso(pool: &SqlitePool, id: i64) -> Result<(), ActivosError> {
    sqlx::query("UPDATE usuarios SET ultimo_acceso = ? WHERE id = ?")
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| ActivosError::Database(format!("Failed to update last login: {}", e)))?;

    Ok(())
}

/// Store a password-reset token hash with its expiry
pub async fn set_reset_token(
    pool: &SqlitePool,
    id: i64,
    token_hash: &str,
    expira: DateTime<Utc>,
) -> Result<(), ActivosError> {
    sqlx::query("UPDATE usuarios SET reset_token = ?, reset_token_expira = ? WHERE id = ?")
        .bind(token_hash)
        .bind(expira.to_rfc3339())
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| ActivosError::Database(format!("Failed to set reset token: {}", e)))?;

    Ok(())
}

/// Find the account carrying a reset-token hash
pub async fn find_by_reset_token(
    pool: &SqlitePool,
    token_hash: &str,
) -> Result<Option<Usuario>, ActivosError> {
    let row = sqlx::query_as::<_, UsuarioRow>(&format!(
        "{} WHERE u.reset_token = ?",
        SELECT_USUARIO
    ))
    .bind(token_hash)
    .fetch_optional(pool)
    .await
    .map_err(|e| ActivosError::Database(format!("Failed to find reset token: {}", e)))?;

    Ok(row.map(|r| r.into_usuario()))
}

/// Clear any pending reset token
pub async fn clear_reset_token(pool: &SqlitePool, id: i64) -> Result<(), ActivosError> {
    sqlx::query("UPDATE usuarios SET reset_token = NULL, reset_token_expira = NULL WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| ActivosError::Database(format!("Failed to clear reset token: {}", e)))?;

    Ok(())
}

/// Delete an account
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), ActivosError> {
    sqlx::query("DELETE FROM usuarios WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| ActivosError::Database(format!("Failed to delete user: {}", e)))?;

    Ok(())
}

/// First-boot check (no accounts yet)
pub async fn is_first_boot(pool: &SqlitePool) -> Result<bool, ActivosError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM usuarios")
        .fetch_one(pool)
        .await
        .map_err(|e| ActivosError::Database(format!("Failed to check first boot: {}", e)))?;

    Ok(count == 0)
}

/// Count active accounts
pub async fn count_activos(pool: &SqlitePool) -> Result<i64, ActivosError> {
    sqlx::query_scalar("SELECT COUNT(*) FROM usuarios WHERE activo = 1")
        .fetch_one(pool)
        .await
        .map_err(|e| ActivosError::Database(format!("Failed to count users: {}", e)))
}

/// Whether this user is the last active administrator (deletion guard)
pub async fn is_last_admin(pool: &SqlitePool, id: i64) -> Result<bool, ActivosError> {
    let user = find_by_id(pool, id)
        .await?
        .ok_or_else(|| ActivosError::NotFound("Usuario no encontrado".to_string()))?;

    if !user.es_administrador() {
        return Ok(false);
    }

    let admin_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM usuarios u JOIN roles r ON u.rol_id = r.id \
         WHERE r.nombre = ? AND u.activo = 1",
    )
    .bind(crate::common::auth::Usuario::ROL_ADMINISTRADOR)
    .fetch_one(pool)
    .await
    .map_err(|e| ActivosError::Database(format!("Failed to count admins: {}", e)))?;

    Ok(admin_count == 1)
}

// Internal row type for SQLite fetches
#[derive(sqlx::FromRow)]
struct UsuarioRow {
    id: i64,
    email: String,
    nombre: String,
    password_hash: String,
    rol_id: i64,
    rol: String,
    activo: i64,
    reset_token: Option<String>,
    reset_token_expira: Option<String>,
    ultimo_acceso: Option<String>,
    creado_en: String,
}

impl UsuarioRow {
    fn into_usuario(self) -> Usuario {
        let parse_ts = |s: &str| {
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_default()
        };
        Usuario {
            id: self.id,
            email: self.email,
            nombre: self.nombre,
            password_hash: self.password_hash,
            rol_id: self.rol_id,
            rol: self.rol,
            activo: self.activo != 0,
            reset_token: self.reset_token,
            reset_token_expira: self.reset_token_expira.as_deref().map(parse_ts),
            ultimo_acceso: self.ultimo_acceso.as_deref().map(parse_ts),
            creado_en: parse_ts(&self.creado_en),
        }
    }
}
