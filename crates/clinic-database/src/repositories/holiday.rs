//! Academic holiday repository implementation.

use chrono::NaiveDate;
use sqlx::PgPool;

use clinic_core::error::{AppError, ErrorKind};
use clinic_core::result::AppResult;
use clinic_entity::holiday::{AcademicHoliday, UpsertHoliday, UpsertOutcome};

/// Repository for academic calendar entries.
#[derive(Debug, Clone)]
pub struct HolidayRepository {
    pool: PgPool,
}

impl HolidayRepository {
    /// Create a new holiday repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert or update an entry keyed by `(name, academic_year)`.
    pub async fn upsert(&self, data: &UpsertHoliday) -> AppResult<UpsertOutcome> {
        // xmax is zero only for freshly inserted tuples.
        let inserted: bool = sqlx::query_scalar(
            "INSERT INTO academic_holidays \
                (name, start_date, end_date, holiday_type, blocks_appointments, source, academic_year) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (name, academic_year) DO UPDATE SET \
                start_date = EXCLUDED.start_date, \
                end_date = EXCLUDED.end_date, \
                holiday_type = EXCLUDED.holiday_type, \
                blocks_appointments = EXCLUDED.blocks_appointments, \
                source = EXCLUDED.source, \
                updated_at = NOW() \
             RETURNING (xmax = 0)",
        )
        .bind(&data.name)
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(data.holiday_type)
        .bind(data.blocks_appointments)
        .bind(&data.source)
        .bind(&data.academic_year)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert holiday", e))?;

        Ok(if inserted {
            UpsertOutcome::Created
        } else {
            UpsertOutcome::Updated
        })
    }

    /// List entries for an academic year, or every entry when `None`.
    pub async fn find_all(&self, academic_year: Option<&str>) -> AppResult<Vec<AcademicHoliday>> {
        sqlx::query_as::<_, AcademicHoliday>(
            "SELECT * FROM academic_holidays WHERE ($1::text IS NULL OR academic_year = $1) \
             ORDER BY start_date ASC",
        )
        .bind(academic_year)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list holidays", e))
    }

    /// Entries that cover `date` and close booking.
    pub async fn find_blocking_on(&self, date: NaiveDate) -> AppResult<Vec<AcademicHoliday>> {
        sqlx::query_as::<_, AcademicHoliday>(
            "SELECT * FROM academic_holidays \
             WHERE blocks_appointments AND start_date <= $1 AND end_date >= $1 \
             ORDER BY start_date ASC",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to look up blocking holidays", e)
        })
    }
}
