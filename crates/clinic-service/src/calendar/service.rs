//! Academic calendar synchronization.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::{debug, info, warn};

use clinic_core::config::calendar::CalendarConfig;
use clinic_entity::holiday::{HolidayKind, UpsertHoliday, UpsertOutcome, academic_year_label};

use super::classify::classify;
use super::fetcher::CalendarFetcher;
use super::national::{fallback_academic, national_holidays};
use super::rules::{ExtractedEntry, extract};
use super::store::HolidayStore;

/// Outcome of one sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// First calendar year of the academic year.
    pub year: i32,
    /// Academic year label, e.g. `2025-2026`.
    pub academic_year: String,
    /// Entries created.
    pub synced: u32,
    /// Entries that already existed and were updated.
    pub updated: u32,
    /// Entries the store rejected.
    pub failed: u32,
    /// Candidate URLs probed.
    pub sources_checked: u32,
    /// Responsive candidates that were not known sources.
    pub new_calendars_found: u32,
    /// The discovered URLs themselves.
    pub discovered_sources: Vec<String>,
}

/// Populates the holiday store from published calendars.
#[derive(Debug, Clone)]
pub struct CalendarSyncService {
    fetcher: Arc<dyn CalendarFetcher>,
    store: Arc<dyn HolidayStore>,
    candidate_urls: Vec<String>,
    known_sources: Vec<String>,
}

/// Substitute `{year}` and `{next_year}` in a URL template.
pub fn expand_template(template: &str, year: i32) -> String {
    template
        .replace("{next_year}", &(year + 1).to_string())
        .replace("{year}", &year.to_string())
}

/// First calendar year of the academic year `today` falls in.
pub fn current_academic_start(today: NaiveDate) -> i32 {
    if today.month() >= 9 {
        today.year()
    } else {
        today.year() - 1
    }
}

impl CalendarSyncService {
    /// Create a new sync service.
    pub fn new(
        fetcher: Arc<dyn CalendarFetcher>,
        store: Arc<dyn HolidayStore>,
        config: &CalendarConfig,
    ) -> Self {
        Self {
            fetcher,
            store,
            candidate_urls: config.candidate_urls.clone(),
            known_sources: config.known_sources.clone(),
        }
    }

    /// Sync the academic year starting in `year`.
    ///
    /// Never fails: fetch problems are logged and skipped, store problems
    /// are counted in [`SyncReport::failed`].
    pub async fn sync(&self, year: i32) -> SyncReport {
        let academic_year = academic_year_label(year);
        let mut report = SyncReport {
            year,
            academic_year: academic_year.clone(),
            ..Default::default()
        };

        info!(year, academic_year = %academic_year, "Starting academic calendar sync");

        let known: Vec<String> = self
            .known_sources
            .iter()
            .map(|s| expand_template(s, year))
            .collect();

        for template in &self.candidate_urls {
            let url = expand_template(template, year);
            report.sources_checked += 1;
            if self.fetcher.probe(&url).await && !known.contains(&url) {
                info!(url = %url, "Discovered new academic calendar");
                report.discovered_sources.push(url);
            }
        }
        report.new_calendars_found = report.discovered_sources.len() as u32;

        let mut extracted: Vec<ExtractedEntry> = Vec::new();
        let sources: Vec<String> = known
            .iter()
            .chain(report.discovered_sources.iter())
            .cloned()
            .collect();
        let mut entry_sources: Vec<String> = Vec::new();

        for url in &sources {
            match self.fetcher.fetch_text(url).await {
                Ok(text) => {
                    let found = extract(&text, year);
                    debug!(url = %url, entries = found.len(), "Extracted calendar entries");
                    for entry in found {
                        if extracted.iter().all(|e| e.name != entry.name) {
                            entry_sources.push(url.clone());
                            extracted.push(entry);
                        }
                    }
                }
                Err(e) => warn!(url = %url, error = %e, "Skipping calendar source"),
            }
        }

        let mut holidays: Vec<UpsertHoliday> = if extracted.is_empty() {
            info!(year, "No calendar entries extracted, using curated fallback");
            fallback_academic(year)
        } else {
            extracted
                .into_iter()
                .zip(entry_sources)
                .map(|(entry, source)| to_holiday(entry, source, &academic_year))
                .collect()
        };

        let national = national_holidays(year);
        let national_names: HashSet<&str> = national.iter().map(|h| h.name.as_str()).collect();
        holidays.retain(|h| !national_names.contains(h.name.as_str()));
        holidays.extend(national);

        for holiday in &holidays {
            match self.store.upsert(holiday).await {
                Ok(UpsertOutcome::Created) => report.synced += 1,
                Ok(UpsertOutcome::Updated) => report.updated += 1,
                Err(e) => {
                    warn!(name = %holiday.name, error = %e, "Failed to store holiday");
                    report.failed += 1;
                }
            }
        }

        info!(
            year,
            synced = report.synced,
            updated = report.updated,
            failed = report.failed,
            sources_checked = report.sources_checked,
            new_calendars_found = report.new_calendars_found,
            "Academic calendar sync finished"
        );

        report
    }
}

fn to_holiday(entry: ExtractedEntry, source: String, academic_year: &str) -> UpsertHoliday {
    let kind = match classify(&entry.line) {
        HolidayKind::Other => entry.hint.unwrap_or(HolidayKind::Other),
        kind => kind,
    };
    UpsertHoliday {
        name: entry.name,
        start_date: entry.start_date,
        end_date: entry.end_date,
        holiday_type: kind,
        blocks_appointments: kind.blocks_appointments_by_default(),
        source,
        academic_year: academic_year.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use clinic_core::error::AppError;
    use clinic_core::result::AppResult;

    use super::*;
    use crate::calendar::national::{FALLBACK_SOURCE, NATIONAL_SOURCE};

    #[derive(Debug, Default)]
    struct FakeFetcher {
        live: Vec<String>,
        documents: HashMap<String, String>,
    }

    #[async_trait]
    impl CalendarFetcher for FakeFetcher {
        async fn probe(&self, url: &str) -> bool {
            self.live.iter().any(|u| u == url)
        }

        async fn fetch_text(&self, url: &str) -> Result<String, AppError> {
            self.documents
                .get(url)
                .cloned()
                .ok_or_else(|| AppError::external_service(format!("unreachable: {url}")))
        }
    }

    #[derive(Debug, Default)]
    struct MemoryStore {
        rows: Mutex<HashMap<(String, String), UpsertHoliday>>,
        reject: Option<String>,
    }

    #[async_trait]
    impl HolidayStore for MemoryStore {
        async fn upsert(&self, holiday: &UpsertHoliday) -> AppResult<UpsertOutcome> {
            if self.reject.as_deref() == Some(holiday.name.as_str()) {
                return Err(AppError::internal("constraint violated"));
            }
            let key = (holiday.name.clone(), holiday.academic_year.clone());
            let previous = self.rows.lock().await.insert(key, holiday.clone());
            Ok(match previous {
                Some(_) => UpsertOutcome::Updated,
                None => UpsertOutcome::Created,
            })
        }
    }

    fn config(candidates: &[&str], known: &[&str]) -> CalendarConfig {
        CalendarConfig {
            candidate_urls: candidates.iter().map(|s| s.to_string()).collect(),
            known_sources: known.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    const CALENDAR: &str = "\
29 Ekim 2025 Cumhuriyet Bayramı
Yarıyıl Tatili 26.01.2026 - 06.02.2026
19-22 Mart 2026 Ramazan Bayramı
";

    #[test]
    fn test_expand_template() {
        assert_eq!(
            expand_template("https://x.edu/{year}-{next_year}.pdf", 2025),
            "https://x.edu/2025-2026.pdf"
        );
    }

    #[test]
    fn test_current_academic_start() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        assert_eq!(current_academic_start(d(2025, 9, 1)), 2025);
        assert_eq!(current_academic_start(d(2026, 3, 15)), 2025);
        assert_eq!(current_academic_start(d(2026, 8, 31)), 2025);
    }

    #[tokio::test]
    async fn test_offline_sync_still_yields_national_holidays() {
        let store = Arc::new(MemoryStore::default());
        let service = CalendarSyncService::new(
            Arc::new(FakeFetcher::default()),
            store.clone(),
            &config(&["https://a.edu/{year}.pdf", "https://b.edu/{year}.pdf"], &[]),
        );

        let report = service.sync(2025).await;
        assert_eq!(report.academic_year, "2025-2026");
        assert_eq!(report.sources_checked, 2);
        assert_eq!(report.new_calendars_found, 0);
        assert!(report.synced >= 6);
        assert_eq!(report.failed, 0);

        let rows = store.rows.lock().await;
        let national = rows.values().filter(|h| h.source == NATIONAL_SOURCE).count();
        assert_eq!(national, 6);
        assert!(rows.values().any(|h| h.source == FALLBACK_SOURCE));
    }

    #[tokio::test]
    async fn test_discovered_source_is_fetched_and_classified() {
        let url = "https://oidb.example.edu/2025-2026.pdf".to_string();
        let fetcher = FakeFetcher {
            live: vec![url.clone()],
            documents: HashMap::from([(url.clone(), CALENDAR.to_string())]),
        };
        let store = Arc::new(MemoryStore::default());
        let service = CalendarSyncService::new(
            Arc::new(fetcher),
            store.clone(),
            &config(&["https://oidb.example.edu/{year}-{next_year}.pdf"], &[]),
        );

        let report = service.sync(2025).await;
        assert_eq!(report.discovered_sources, vec![url.clone()]);
        assert_eq!(report.new_calendars_found, 1);
        // Two extracted entries plus six national ones; the extracted
        // "Cumhuriyet Bayramı" gives way to the national entry.
        assert_eq!(report.synced, 8);

        let rows = store.rows.lock().await;
        let ramazan = &rows[&("Ramazan Bayramı".to_string(), "2025-2026".to_string())];
        assert_eq!(ramazan.holiday_type, HolidayKind::ReligiousHoliday);
        assert!(ramazan.blocks_appointments);
        assert_eq!(ramazan.source, url);

        let republic = &rows[&("Cumhuriyet Bayramı".to_string(), "2025-2026".to_string())];
        assert_eq!(republic.source, NATIONAL_SOURCE);

        let fallback = rows.values().filter(|h| h.source == FALLBACK_SOURCE).count();
        assert_eq!(fallback, 0);
    }

    #[tokio::test]
    async fn test_known_source_is_not_reported_as_new() {
        let url = "https://oidb.example.edu/2025.pdf".to_string();
        let fetcher = FakeFetcher {
            live: vec![url.clone()],
            documents: HashMap::from([(url.clone(), CALENDAR.to_string())]),
        };
        let service = CalendarSyncService::new(
            Arc::new(fetcher),
            Arc::new(MemoryStore::default()),
            &config(&["https://oidb.example.edu/{year}.pdf"], &["https://oidb.example.edu/{year}.pdf"]),
        );

        let report = service.sync(2025).await;
        assert_eq!(report.new_calendars_found, 0);
        assert_eq!(report.synced, 8);
    }

    #[tokio::test]
    async fn test_rerun_updates_and_failures_are_counted() {
        let store = Arc::new(MemoryStore {
            reject: Some("Zafer Bayramı".to_string()),
            ..Default::default()
        });
        let service = CalendarSyncService::new(
            Arc::new(FakeFetcher::default()),
            store.clone(),
            &config(&[], &[]),
        );

        let first = service.sync(2025).await;
        assert_eq!(first.failed, 1);
        assert_eq!(first.synced, 8);

        let second = service.sync(2025).await;
        assert_eq!(second.synced, 0);
        assert_eq!(second.updated, 8);
        assert_eq!(second.failed, 1);
    }
}
