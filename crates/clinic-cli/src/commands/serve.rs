//! `clinic-cli serve`

use clap::Args;

use clinic_core::config::AppConfig;
use clinic_core::error::AppError;

use crate::output;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Port to listen on instead of `server.port`
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind instead of `server.host`
    #[arg(long)]
    pub host: Option<String>,

    /// Assume the schema is already current
    #[arg(long)]
    pub no_migrate: bool,

    /// Serve HTTP only; no job runner or cron tasks
    #[arg(long)]
    pub no_worker: bool,
}

pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> Result<(), AppError> {
    config.server.port = args.port.unwrap_or(config.server.port);
    if let Some(host) = &args.host {
        config.server.host.clone_from(host);
    }
    config.worker.enabled &= !args.no_worker;

    output::print_kv("Listening on", &config.server.bind_addr()?.to_string());
    output::print_kv("Worker", if config.worker.enabled { "enabled" } else { "disabled" });

    let pool = super::create_db_pool(&config).await?;
    if args.no_migrate {
        output::print_warning("Skipping migrations");
    } else {
        clinic_database::migration::run_migrations(&pool).await?;
        output::print_success("Migrations applied");
    }

    clinic_api::run_server(config, pool).await
}
