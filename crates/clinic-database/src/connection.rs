//! Opening the Postgres pool.

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use clinic_core::config::database::DatabaseConfig;
use clinic_core::error::{AppError, ErrorKind};

/// Open the pool and wait for the first connection.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, AppError> {
    info!(
        url = %redact_url(&config.url),
        max_connections = config.max_connections,
        "Connecting to Postgres"
    );

    let pool = pool_options(config).connect(&config.url).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to connect to database: {e}"),
            e,
        )
    })?;

    info!("Postgres pool ready");
    Ok(pool)
}

/// Build a pool without touching the server; connections open on first use.
pub fn connect_lazy(config: &DatabaseConfig) -> Result<PgPool, AppError> {
    pool_options(config)
        .connect_lazy(&config.url)
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Invalid database URL", e))
}

/// `SELECT 1` round trip.
pub async fn health_check(pool: &PgPool) -> Result<bool, AppError> {
    let one: i32 = sqlx::query_scalar("SELECT 1")
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))?;
    Ok(one == 1)
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
}

/// Replace the password in `url` with `****`.
fn redact_url(url: &str) -> String {
    let Some((credentials, host)) = url.rsplit_once('@') else {
        return url.to_string();
    };
    let (scheme, userinfo) = credentials.split_once("://").unwrap_or(("", credentials));
    match userinfo.split_once(':') {
        Some((user, _)) if scheme.is_empty() => format!("{user}:****@{host}"),
        Some((user, _)) => format!("{scheme}://{user}:****@{host}"),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_url() {
        assert_eq!(
            redact_url("postgres://clinic:s3cret@db:5432/clinic"),
            "postgres://clinic:****@db:5432/clinic"
        );
        assert_eq!(redact_url("postgres://db:5432/clinic"), "postgres://db:5432/clinic");
        assert_eq!(redact_url("postgres://clinic@db/clinic"), "postgres://clinic@db/clinic");
    }

    #[tokio::test]
    async fn test_lazy_pool_does_not_connect() {
        let config: DatabaseConfig =
            serde_json::from_str(r#"{ "url": "postgres://clinic:x@127.0.0.1:1/clinic" }"#).unwrap();
        assert!(connect_lazy(&config).is_ok());
    }
}
