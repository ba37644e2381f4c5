//! CLI command definitions and dispatch.

pub mod calendar;
pub mod migrate;
pub mod serve;
pub mod user;

use clap::{Parser, Subcommand};
use sqlx::PgPool;

use clinic_core::config::AppConfig;
use clinic_core::error::AppError;

use crate::output::OutputFormat;

/// Campus clinic appointment backend
#[derive(Debug, Parser)]
#[command(name = "clinic", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (`config/<env>.toml` over `config/default.toml`)
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the clinic server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Academic calendar sync
    Calendar(calendar::CalendarArgs),
    /// User management
    User(user::UserArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load(&self.env)?;
        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Migrate(args) => migrate::execute(args, &config, self.format).await,
            Commands::Calendar(args) => calendar::execute(args, &config, self.format).await,
            Commands::User(args) => user::execute(args, &config, self.format).await,
        }
    }
}

/// Open a database pool from config.
pub async fn create_db_pool(config: &AppConfig) -> Result<PgPool, AppError> {
    clinic_database::connect(&config.database).await
}
