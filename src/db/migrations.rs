// Database migrations

use crate::common::error::ActivosError;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};

/// Create the SQLite pool and run migrations
///
/// The database file is created when it does not exist yet.
pub async fn initialize_database(database_url: &str) -> Result<SqlitePool, ActivosError> {
    if !Sqlite::database_exists(database_url)
        .await
        .map_err(|e| ActivosError::Database(format!("Failed to check database: {}", e)))?
    {
        tracing::info!("Creating database: {}", database_url);
        Sqlite::create_database(database_url)
            .await
            .map_err(|e| ActivosError::Database(format!("Failed to create database: {}", e)))?;
    }

    let pool = SqlitePool::connect(database_url)
        .await
        .map_err(|e| ActivosError::Database(format!("Failed to connect to database: {}", e)))?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run pending migrations (sqlx::migrate! macro)
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), ActivosError> {
    tracing::info!("Running database migrations");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| ActivosError::Database(format!("Failed to run migrations: {}", e)))?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}
