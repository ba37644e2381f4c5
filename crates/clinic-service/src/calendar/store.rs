//! Persistence seam for synced holidays.

use async_trait::async_trait;

use clinic_core::result::AppResult;
use clinic_database::repositories::HolidayRepository;
use clinic_entity::holiday::{UpsertHoliday, UpsertOutcome};

/// Where synced holidays are written.
#[async_trait]
pub trait HolidayStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert or update by `(name, academic_year)`.
    async fn upsert(&self, holiday: &UpsertHoliday) -> AppResult<UpsertOutcome>;
}

#[async_trait]
impl HolidayStore for HolidayRepository {
    async fn upsert(&self, holiday: &UpsertHoliday) -> AppResult<UpsertOutcome> {
        HolidayRepository::upsert(self, holiday).await
    }
}
