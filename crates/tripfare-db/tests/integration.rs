//! Offline unit tests for tripfare-db pool configuration and row types.
//! These tests do not require a live database connection.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use tripfare_core::{AppConfig, Environment, ExchangeRates};
use tripfare_db::{DepartureRow, PackageRow, PoolConfig, RateFlightPriceRow};

fn app_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3100),
        log_level: "info".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        supplier_base_url: "https://supplier.example.com".to_string(),
        supplier_api_key: None,
        supplier_shared_secret: None,
        supplier_timeout_secs: 60,
        catalog_page_size: 100,
        catalog_inter_page_delay_ms: 250,
        flight_api_base_url: "https://flights.example.com".to_string(),
        flight_api_key: None,
        flight_source: "serp".to_string(),
        flight_carry_on_only: false,
        flight_timeout_secs: 60,
        flight_batch_size: 5,
        flight_inter_batch_delay_ms: 500,
        flight_max_retries: 2,
        flight_retry_backoff_base_ms: 1000,
        exchange_rates: ExchangeRates::from_env_str("USD=1.28"),
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn pool_config_defaults_are_sane() {
    let defaults = PoolConfig::default();
    assert!(defaults.max_connections >= defaults.min_connections);
    assert!(defaults.acquire_timeout_secs > 0);
}

/// Compile-time smoke test: confirm the row structs carry the fields the
/// orchestrator and API read. No database required.
#[test]
fn row_types_have_expected_fields() {
    use chrono::Utc;
    use rust_decimal::Decimal;

    let package = PackageRow {
        id: 1,
        slug: "classic-morocco".to_string(),
        title: "Classic Morocco".to_string(),
        supplier_product_id: "tour-1".to_string(),
        duration_nights: Some(7),
        auto_refresh_enabled: true,
        lead_price: Some(Decimal::from(1249)),
        single_lead_price: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    assert!(package.auto_refresh_enabled);

    let departure = DepartureRow {
        id: 1,
        package_id: package.id,
        departure_date: "2025-06-01".parse().unwrap(),
        start_time: None,
        total_capacity: Some(20),
        available_capacity: Some(8),
        sold_out: false,
    };
    assert_eq!(departure.package_id, 1);

    let price = RateFlightPriceRow {
        id: 1,
        rate_id: 10,
        airport_code: "LGW".to_string(),
        flight_price: Decimal::from(180),
        combined_price: Decimal::from(1249),
        markup_percent: Decimal::from(12),
        flight_source: "serp".to_string(),
        updated_at: Utc::now(),
    };
    assert_eq!(price.airport_code, "LGW");
}
