//! Activos server entry point

use activos::audit::recorder::AuditRecorder;
use activos::config::Config;
use activos::{auth, db, logging, server, AppState};
use clap::Parser;
use tracing::warn;

#[derive(Parser)]
#[command(name = "activos", version, about = "Asset and personnel management server")]
struct Cli {
    /// Bind host (overrides ACTIVOS_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides ACTIVOS_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Database URL (overrides ACTIVOS_DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() {
    logging::init();

    let cli = Cli::parse();
    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(database_url) = cli.database_url {
        config.database_url = database_url;
    }

    let db_pool = db::migrations::initialize_database(&config.database_url)
        .await
        .expect("Failed to initialize database");

    if let Err(e) = auth::bootstrap::create_admin_from_env(&db_pool).await {
        warn!("Admin bootstrap failed: {}", e);
    }

    let state = AppState {
        db_pool: db_pool.clone(),
        jwt_secret: config.jwt_secret.clone(),
        audit: AuditRecorder::new(db_pool),
    };

    server::run(state, &config.bind_addr()).await;
}
