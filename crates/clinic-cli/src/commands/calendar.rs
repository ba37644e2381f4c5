//! Academic calendar sync from the command line.

use std::sync::Arc;

use chrono::Utc;
use clap::{Args, Subcommand};

use clinic_cache::CacheManager;
use clinic_core::config::AppConfig;
use clinic_core::error::AppError;
use clinic_database::repositories::{HolidayRepository, SyncReportRepository};
use clinic_service::calendar::{
    CalendarFetcher, CalendarSyncService, HolidayStore, HttpCalendarFetcher, SyncReportLog,
    SyncReportStore, current_academic_start,
};

use crate::output::{self, OutputFormat};

/// Arguments for calendar commands
#[derive(Debug, Args)]
pub struct CalendarArgs {
    #[command(subcommand)]
    pub command: CalendarCommand,
}

/// Calendar subcommands
#[derive(Debug, Subcommand)]
pub enum CalendarCommand {
    /// Fetch published calendars and refresh the holiday table
    Sync {
        /// First calendar year of the academic year (defaults to the current one)
        #[arg(short, long)]
        year: Option<i32>,
    },
}

/// Execute calendar commands
pub async fn execute(
    args: &CalendarArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        CalendarCommand::Sync { year } => {
            let pool = super::create_db_pool(config).await?;
            let fetcher: Arc<dyn CalendarFetcher> =
                Arc::new(HttpCalendarFetcher::new(&config.calendar)?);
            let store: Arc<dyn HolidayStore> = Arc::new(HolidayRepository::new(pool.clone()));
            let service = CalendarSyncService::new(fetcher, store, &config.calendar);
            let report_store: Arc<dyn SyncReportStore> = Arc::new(SyncReportRepository::new(pool));
            let reports = SyncReportLog::new(report_store, CacheManager::new(&config.cache));

            let year = year.unwrap_or_else(|| current_academic_start(Utc::now().date_naive()));
            println!("Syncing academic calendar {year}...");
            let report = service.sync(year).await;
            if let Err(e) = reports.record(&report).await {
                output::print_warning(&format!("Sync report was not saved: {e}"));
            }

            output::print_item(&report, format);
            if report.failed > 0 {
                output::print_warning(&format!("{} entries could not be stored", report.failed));
            } else {
                output::print_success(&format!(
                    "Calendar {} synced ({} new, {} updated)",
                    report.academic_year, report.synced, report.updated
                ));
            }
        }
    }

    Ok(())
}
