//! Database migration commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use clinic_core::config::AppConfig;
use clinic_core::error::AppError;
use clinic_database::migration::{self, MigrationStatus};

use crate::output::{self, OutputFormat};

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
    /// Show which migrations have been applied
    Status,
}

#[derive(Debug, Serialize, Tabled)]
struct MigrationRow {
    version: i64,
    description: String,
    applied: String,
}

impl From<MigrationStatus> for MigrationRow {
    fn from(status: MigrationStatus) -> Self {
        Self {
            version: status.version,
            description: status.description,
            applied: if status.applied { "yes" } else { "pending" }.to_string(),
        }
    }
}

/// Execute migration commands
pub async fn execute(
    args: &MigrateArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;

    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            migration::run_migrations(&pool).await?;
            output::print_success("All migrations applied successfully.");
        }
        MigrateCommand::Status => {
            let rows: Vec<MigrationRow> = migration::migration_status(&pool)
                .await?
                .into_iter()
                .map(MigrationRow::from)
                .collect();
            let pending = rows.iter().filter(|r| r.applied == "pending").count();
            output::print_list(&rows, format);
            if pending > 0 {
                output::print_warning(&format!("{pending} migration(s) pending"));
            }
        }
    }

    Ok(())
}
