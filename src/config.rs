//! Configuration management via environment variables

use crate::common::error::{ActivosError, ActivosResult};

/// Get an environment variable, trimmed, treating empty values as unset
pub fn get_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value
pub fn get_env_or(name: &str, default: &str) -> String {
    get_env(name).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable parsed to a specific type
///
/// Returns the default when the variable is unset or fails to parse.
pub fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    get_env(name).and_then(|s| s.parse().ok()).unwrap_or(default)
}

/// Server configuration, resolved once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// SQLite database URL
    pub database_url: String,
    /// Shared secret for session-token signing
    pub jwt_secret: String,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// The signing secret has no insecure default: with
    /// `ACTIVOS_ENV=production` startup fails when `ACTIVOS_JWT_SECRET` is
    /// unset; other environments get a random per-process secret and a
    /// warning (sessions do not survive a restart in that mode).
    pub fn from_env() -> ActivosResult<Self> {
        let host = get_env_or("ACTIVOS_HOST", "0.0.0.0");
        let port = get_env_parse("ACTIVOS_PORT", 8080u16);
        let database_url = get_env_or("ACTIVOS_DATABASE_URL", "sqlite:data/activos.db");
        let jwt_secret = resolve_jwt_secret()?;

        Ok(Self {
            host,
            port,
            database_url,
            jwt_secret,
        })
    }

    /// Bind address string
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn is_production() -> bool {
    matches!(
        get_env("ACTIVOS_ENV").as_deref(),
        Some("production") | Some("prod")
    )
}

fn resolve_jwt_secret() -> ActivosResult<String> {
    if let Some(secret) = get_env("ACTIVOS_JWT_SECRET") {
        return Ok(secret);
    }
    if is_production() {
        return Err(ActivosError::Config(
            "ACTIVOS_JWT_SECRET must be set when ACTIVOS_ENV=production".to_string(),
        ));
    }
    tracing::warn!(
        "ACTIVOS_JWT_SECRET not set; using a random per-process secret. \
         Sessions will not survive a restart."
    );
    Ok(crate::auth::generate_random_token(48))
}
