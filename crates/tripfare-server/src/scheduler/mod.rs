//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the two
//! weekly refresh jobs: flight prices (Sunday 03:00 UTC) and the supplier
//! catalog (Sunday 20:00 UTC).

mod catalog_refresh;
mod flight_refresh;

use std::sync::Arc;

use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use tripfare_core::{AppConfig, CatalogCache};
use tripfare_flights::FlightClient;
use tripfare_supplier::SupplierClient;

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process — dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    pool: PgPool,
    cache: Arc<CatalogCache>,
    supplier: Arc<SupplierClient>,
    flights: Arc<FlightClient>,
    config: Arc<AppConfig>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_flight_refresh_job(
        &scheduler,
        pool,
        Arc::clone(&cache),
        Arc::clone(&supplier),
        flights,
        Arc::clone(&config),
    )
    .await?;
    register_catalog_refresh_job(&scheduler, cache, supplier, config).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the weekly flight-price refresh.
///
/// Runs every Sunday at 03:00 UTC (`0 0 3 * * SUN`), repricing every package
/// with `auto_refresh_enabled` set. One package failing never stops the rest.
async fn register_flight_refresh_job(
    scheduler: &JobScheduler,
    pool: PgPool,
    cache: Arc<CatalogCache>,
    supplier: Arc<SupplierClient>,
    flights: Arc<FlightClient>,
    config: Arc<AppConfig>,
) -> Result<(), JobSchedulerError> {
    let pool = Arc::new(pool);

    let job = Job::new_async("0 0 3 * * SUN", move |_uuid, _lock| {
        let pool = Arc::clone(&pool);
        let cache = Arc::clone(&cache);
        let supplier = Arc::clone(&supplier);
        let flights = Arc::clone(&flights);
        let config = Arc::clone(&config);

        Box::pin(async move {
            tracing::info!("scheduler: starting weekly flight-price refresh");
            let summary = flight_refresh::run(&pool, &cache, &supplier, &flights, &config).await;
            tracing::info!(
                succeeded = summary.succeeded,
                failed = summary.failed,
                rows_updated = summary.rows_updated,
                "scheduler: weekly flight-price refresh complete"
            );
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

/// Register the weekly catalog refresh.
///
/// Runs every Sunday at 20:00 UTC (`0 0 20 * * SUN`) and rebuilds the cached
/// catalog snapshot for every supported currency.
async fn register_catalog_refresh_job(
    scheduler: &JobScheduler,
    cache: Arc<CatalogCache>,
    supplier: Arc<SupplierClient>,
    config: Arc<AppConfig>,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async("0 0 20 * * SUN", move |_uuid, _lock| {
        let cache = Arc::clone(&cache);
        let supplier = Arc::clone(&supplier);
        let config = Arc::clone(&config);

        Box::pin(async move {
            tracing::info!("scheduler: starting weekly catalog refresh");
            catalog_refresh::run(&cache, &supplier, &config).await;
            tracing::info!("scheduler: weekly catalog refresh complete");
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}
