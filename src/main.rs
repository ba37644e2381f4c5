//! Campus clinic server: appointment workflow backend.
//!
//! Main entry point that loads configuration, prepares the database, and
//! starts the HTTP server with its background worker.

use tracing_subscriber::{EnvFilter, fmt};

use clinic_core::config::AppConfig;
use clinic_core::config::logging::LogFormat;
use clinic_core::error::AppError;

#[tokio::main]
async fn main() {
    let env = std::env::var("CLINIC_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting campus clinic v{}", env!("CARGO_PKG_VERSION"));

    let pool = clinic_database::connect(&config.database).await?;
    clinic_database::migration::run_migrations(&pool).await?;

    clinic_api::run_server(config, pool).await
}
