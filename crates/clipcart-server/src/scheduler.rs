//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the
//! recurring stage passes. The store gates every transition, so overlapping
//! runs of different stages are safe by design.

use std::sync::Arc;

use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::passes;

/// Builds and starts the background job scheduler.
///
/// Registers the recurring stage passes and starts the scheduler. Returns
/// the running [`JobScheduler`] handle, which must be kept alive for the
/// lifetime of the process — dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a job cannot be registered, or the scheduler fails to start.
pub(crate) async fn build_scheduler(
    pool: PgPool,
    config: Arc<clipcart_core::AppConfig>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_download_job(&scheduler, pool.clone(), Arc::clone(&config)).await?;
    register_render_job(&scheduler, pool.clone(), Arc::clone(&config)).await?;
    register_upload_job(&scheduler, pool, config).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// Nightly acquisition pass at 03:00 UTC.
async fn register_download_job(
    scheduler: &JobScheduler,
    pool: PgPool,
    config: Arc<clipcart_core::AppConfig>,
) -> Result<(), JobSchedulerError> {
    let pool = Arc::new(pool);

    let job = Job::new_async("0 0 3 * * *", move |_uuid, _lock| {
        let pool = Arc::clone(&pool);
        let config = Arc::clone(&config);

        Box::pin(async move {
            tracing::info!("scheduler: starting download pass");
            match passes::download_pass(&pool, &config).await {
                Ok(summary) => tracing::info!(
                    attempted = summary.attempted,
                    succeeded = summary.succeeded,
                    "scheduler: download pass complete"
                ),
                Err(e) => tracing::error!(error = %e, "scheduler: download pass failed"),
            }
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

/// Nightly render pass at 03:30 UTC, after acquisition has had its turn.
async fn register_render_job(
    scheduler: &JobScheduler,
    pool: PgPool,
    config: Arc<clipcart_core::AppConfig>,
) -> Result<(), JobSchedulerError> {
    let pool = Arc::new(pool);

    let job = Job::new_async("0 30 3 * * *", move |_uuid, _lock| {
        let pool = Arc::clone(&pool);
        let config = Arc::clone(&config);

        Box::pin(async move {
            tracing::info!("scheduler: starting render pass");
            match passes::render_pass(&pool, &config).await {
                Ok(summary) => tracing::info!(
                    attempted = summary.attempted,
                    succeeded = summary.succeeded,
                    "scheduler: render pass complete"
                ),
                Err(e) => tracing::error!(error = %e, "scheduler: render pass failed"),
            }
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

/// Upload pass every four hours; quota gating keeps the cadence harmless.
async fn register_upload_job(
    scheduler: &JobScheduler,
    pool: PgPool,
    config: Arc<clipcart_core::AppConfig>,
) -> Result<(), JobSchedulerError> {
    let pool = Arc::new(pool);

    let job = Job::new_async("0 0 */4 * * *", move |_uuid, _lock| {
        let pool = Arc::clone(&pool);
        let config = Arc::clone(&config);

        Box::pin(async move {
            tracing::info!("scheduler: starting upload pass");
            match passes::upload_pass(&pool, &config).await {
                Ok(summary) => tracing::info!(
                    attempted = summary.attempted,
                    succeeded = summary.succeeded,
                    "scheduler: upload pass complete"
                ),
                Err(e) => tracing::error!(error = %e, "scheduler: upload pass failed"),
            }
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}
