mod api;
mod middleware;
mod scheduler;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(tripfare_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = tripfare_db::PoolConfig::from_app_config(&config);
    let pool = tripfare_db::connect_pool(&config.database_url, pool_config).await?;
    tripfare_db::run_migrations(&pool).await?;

    let supplier = Arc::new(tripfare_supplier::SupplierClient::new(
        &config.supplier_base_url,
        config.supplier_api_key.as_deref().unwrap_or_default(),
        config.supplier_shared_secret.as_deref().unwrap_or_default(),
        config.supplier_timeout_secs,
    )?);
    let flights = Arc::new(tripfare_flights::FlightClient::new(
        tripfare_flights::FlightClientConfig {
            base_url: config.flight_api_base_url.clone(),
            api_key: config.flight_api_key.clone().unwrap_or_default(),
            timeout_secs: config.flight_timeout_secs,
            carry_on_only: config.flight_carry_on_only,
            source: tripfare_flights::FlightSource::from_str_loose(&config.flight_source),
            max_retries: config.flight_max_retries,
            retry_backoff_base_ms: config.flight_retry_backoff_base_ms,
        },
    )?);
    let cache = Arc::new(tripfare_core::CatalogCache::default());

    let state = AppState {
        pool: pool.clone(),
        cache: Arc::clone(&cache),
        supplier: Arc::clone(&supplier),
        flights: Arc::clone(&flights),
        config: Arc::clone(&config),
    };

    let _scheduler =
        scheduler::build_scheduler(pool, cache, supplier, flights, Arc::clone(&config)).await?;

    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
