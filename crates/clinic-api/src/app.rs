//! Application builder: wires state, router, the worker, and the scheduler.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::PgPool;
use tokio::sync::watch;
use tracing::{error, info, warn};
use uuid::Uuid;

use clinic_cache::CacheManager;
use clinic_core::config::AppConfig;
use clinic_core::error::AppError;
use clinic_realtime::RealtimeHub;
use clinic_worker::jobs::{
    CalendarSyncHandler, DeliveryChannels, NotificationCleanupHandler, NotificationDeliveryHandler,
};
use clinic_worker::{CronScheduler, JobExecutor, JobQueue, LoggingMailTransport, WorkerRunner};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the clinic server until Ctrl+C or SIGTERM.
pub async fn run_server(config: AppConfig, db_pool: PgPool) -> Result<(), AppError> {
    info!("Starting campus clinic server...");
    if config.auth.uses_placeholder_secret() {
        warn!("auth.jwt_secret is still the placeholder; set CLINIC__AUTH__JWT_SECRET");
    }

    let cache = CacheManager::new(&config.cache);
    let realtime = RealtimeHub::default();
    let state = AppState::build(config.clone(), db_pool, cache, realtime)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let (worker_handle, scheduler) = if config.worker.enabled {
        let (handle, scheduler) = start_worker(&state, &config, shutdown_rx.clone()).await?;
        (Some(handle), Some(scheduler))
    } else {
        info!("Background worker disabled");
        (None, None)
    };

    let app = build_app(state);
    let addr = config.server.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!(%addr, "Clinic server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            info!("Shutdown signal received");
            let _ = shutdown_tx.send(true);
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(mut scheduler) = scheduler {
        if let Err(e) = scheduler.shutdown().await {
            warn!(error = %e, "Scheduler did not shut down cleanly");
        }
    }
    if let Some(handle) = worker_handle {
        let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
        if tokio::time::timeout(grace, handle).await.is_err() {
            warn!("Worker did not stop within the shutdown grace period");
        }
    }

    info!("Clinic server stopped");
    Ok(())
}

/// Register job handlers, spawn the runner, and start the cron scheduler.
async fn start_worker(
    state: &AppState,
    config: &AppConfig,
    cancel: watch::Receiver<bool>,
) -> Result<(tokio::task::JoinHandle<()>, CronScheduler), AppError> {
    let worker_id = format!("worker-{}", &Uuid::new_v4().simple().to_string()[..8]);
    let queue = Arc::new(JobQueue::new(Arc::clone(&state.job_repo), worker_id));

    let channels = DeliveryChannels::new(
        Arc::new(state.realtime.publisher()),
        Arc::new(LoggingMailTransport),
        config.notifications.mail_from.clone(),
    );

    let mut executor = JobExecutor::new();
    executor.register(Arc::new(NotificationDeliveryHandler::new(
        Arc::clone(&state.notification_repo),
        Arc::clone(&state.user_repo),
        channels,
    )));
    executor.register(Arc::new(CalendarSyncHandler::new(
        Arc::clone(&state.calendar_sync),
        Arc::clone(&state.sync_reports),
    )));
    executor.register(Arc::new(NotificationCleanupHandler::new(
        Arc::clone(&state.notification_repo),
        Arc::clone(&state.job_repo),
        config.notifications.retention_days,
    )));
    info!(handlers = ?executor.registered_types(), "Job handlers registered");

    let runner = WorkerRunner::new(Arc::clone(&queue), Arc::new(executor), config.worker.clone());
    let handle = tokio::spawn(async move {
        runner.run(cancel).await;
    });

    let scheduler = CronScheduler::new(queue).await?;
    scheduler.register_default_tasks(&config.worker).await?;
    scheduler.start().await?;

    Ok((handle, scheduler))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
