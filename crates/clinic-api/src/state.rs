//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use clinic_auth::jwt::{JwtDecoder, JwtEncoder};
use clinic_auth::password::{PasswordHasher, PasswordValidator};
use clinic_auth::rbac::RbacEnforcer;
use clinic_cache::CacheManager;
use clinic_core::config::AppConfig;
use clinic_core::error::AppError;
use clinic_core::traits::EventPublisher;
use clinic_database::repositories::{
    AppointmentRepository, HolidayRepository, JobRepository, MedicalRecordRepository,
    NotificationRepository, SettingRepository, SyncReportRepository, UserRepository,
};
use clinic_realtime::RealtimeHub;
use clinic_service::calendar::{
    CalendarFetcher, HolidayStore, HttpCalendarFetcher, SyncReportLog, SyncReportStore,
};
use clinic_service::{
    AccountGuard, AccountStatuses, AdminUserService, AppointmentService, AuthService, CalendarSyncService, DashboardService,
    HolidayService, MedicalRecordService, NotificationDispatcher, NotificationService,
    SettingsService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL connection pool
    pub db_pool: PgPool,
    /// In-memory cache
    pub cache: CacheManager,
    /// WebSocket fan-out
    pub realtime: RealtimeHub,

    // ── Auth ─────────────────────────────────────────────────
    pub jwt_decoder: Arc<JwtDecoder>,
    pub account_guard: Arc<AccountGuard>,
    pub rbac: Arc<RbacEnforcer>,

    // ── Repositories the worker also needs ───────────────────
    pub user_repo: Arc<UserRepository>,
    pub notification_repo: Arc<NotificationRepository>,
    pub job_repo: Arc<JobRepository>,

    // ── Services ─────────────────────────────────────────────
    pub auth_service: Arc<AuthService>,
    pub admin_user_service: Arc<AdminUserService>,
    pub settings_service: Arc<SettingsService>,
    pub notification_service: Arc<NotificationService>,
    pub appointment_service: Arc<AppointmentService>,
    pub medical_record_service: Arc<MedicalRecordService>,
    pub dashboard_service: Arc<DashboardService>,
    pub holiday_service: Arc<HolidayService>,
    pub calendar_sync: Arc<CalendarSyncService>,
    pub sync_reports: Arc<SyncReportLog>,
}

impl AppState {
    /// Wire repositories and services over `db_pool`.
    ///
    /// Status-change events are published through `realtime`.
    pub fn build(
        config: AppConfig,
        db_pool: PgPool,
        cache: CacheManager,
        realtime: RealtimeHub,
    ) -> Result<Self, AppError> {
        let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
        let appointment_repo = Arc::new(AppointmentRepository::new(db_pool.clone()));
        let holiday_repo = Arc::new(HolidayRepository::new(db_pool.clone()));
        let notification_repo = Arc::new(NotificationRepository::new(db_pool.clone()));
        let job_repo = Arc::new(JobRepository::new(db_pool.clone()));
        let record_repo = Arc::new(MedicalRecordRepository::new(db_pool.clone()));
        let setting_repo = Arc::new(SettingRepository::new(db_pool.clone()));

        let hasher = Arc::new(PasswordHasher::new());
        let validator = Arc::new(PasswordValidator::new(&config.auth));
        let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth, cache.clone()));

        let statuses = AccountStatuses::new(
            cache.clone(),
            Duration::from_secs(config.cache.account_status_ttl_seconds),
        );
        let account_guard = Arc::new(AccountGuard::new(Arc::clone(&user_repo), statuses.clone()));

        let settings_cache = cache.settings(Duration::from_secs(config.cache.settings_ttl_seconds));
        let settings_service = Arc::new(SettingsService::new(setting_repo, settings_cache));

        let dispatcher = Arc::new(NotificationDispatcher::new(
            Arc::clone(&notification_repo),
            Arc::clone(&job_repo),
            &config.notifications,
        ));
        let events: Arc<dyn EventPublisher> = Arc::new(realtime.publisher());

        let appointment_service = Arc::new(AppointmentService::new(
            Arc::clone(&appointment_repo),
            Arc::clone(&user_repo),
            Arc::clone(&holiday_repo),
            Arc::clone(&settings_service),
            Arc::clone(&dispatcher),
            events,
        ));

        let fetcher: Arc<dyn CalendarFetcher> = Arc::new(HttpCalendarFetcher::new(&config.calendar)?);
        let store: Arc<dyn HolidayStore> = holiday_repo.clone();
        let calendar_sync = Arc::new(CalendarSyncService::new(fetcher, store, &config.calendar));
        let report_store: Arc<dyn SyncReportStore> =
            Arc::new(SyncReportRepository::new(db_pool.clone()));
        let sync_reports = Arc::new(SyncReportLog::new(report_store, cache.clone()));

        Ok(Self {
            auth_service: Arc::new(AuthService::new(
                Arc::clone(&user_repo),
                Arc::clone(&hasher),
                Arc::clone(&validator),
                jwt_encoder,
                Arc::clone(&jwt_decoder),
            )),
            admin_user_service: Arc::new(AdminUserService::new(
                Arc::clone(&user_repo),
                hasher,
                validator,
                statuses,
            )),
            notification_service: Arc::new(NotificationService::new(Arc::clone(
                &notification_repo,
            ))),
            medical_record_service: Arc::new(MedicalRecordService::new(
                record_repo,
                Arc::clone(&appointment_repo),
                dispatcher,
            )),
            dashboard_service: Arc::new(DashboardService::new(
                appointment_repo,
                Arc::clone(&user_repo),
                Arc::clone(&notification_repo),
            )),
            holiday_service: Arc::new(HolidayService::new(holiday_repo)),
            calendar_sync,
            sync_reports,
            appointment_service,
            settings_service,
            config: Arc::new(config),
            db_pool,
            cache,
            realtime,
            jwt_decoder,
            account_guard,
            rbac: Arc::new(RbacEnforcer::default()),
            user_repo,
            notification_repo,
            job_repo,
        })
    }
}
