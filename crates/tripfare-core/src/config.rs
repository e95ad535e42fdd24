use crate::app_config::{AppConfig, Environment};
use crate::currency::ExchangeRates;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// The core parsing/validation logic is decoupled from the real environment
/// so tests can drive it with a plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> { lookup(var).ok().filter(|v| !v.is_empty()) };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected a boolean, got '{other}'"),
            }),
        }
    };

    let env = match or_default("TRIPFARE_ENV", "development").as_str() {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    };

    Ok(AppConfig {
        database_url: require("DATABASE_URL")?,
        env,
        bind_addr: parse_addr("TRIPFARE_BIND_ADDR", "127.0.0.1:3100")?,
        log_level: or_default("TRIPFARE_LOG_LEVEL", "info"),
        db_max_connections: parse_u32("TRIPFARE_DB_MAX_CONNECTIONS", "10")?,
        db_min_connections: parse_u32("TRIPFARE_DB_MIN_CONNECTIONS", "1")?,
        db_acquire_timeout_secs: parse_u64("TRIPFARE_DB_ACQUIRE_TIMEOUT_SECS", "10")?,
        supplier_base_url: or_default(
            "TRIPFARE_SUPPLIER_BASE_URL",
            "https://api.tour-supplier.example.com",
        ),
        supplier_api_key: optional("TRIPFARE_SUPPLIER_API_KEY"),
        supplier_shared_secret: optional("TRIPFARE_SUPPLIER_SHARED_SECRET"),
        supplier_timeout_secs: parse_u64("TRIPFARE_SUPPLIER_TIMEOUT_SECS", "60")?,
        catalog_page_size: parse_u32("TRIPFARE_CATALOG_PAGE_SIZE", "100")?,
        catalog_inter_page_delay_ms: parse_u64("TRIPFARE_CATALOG_INTER_PAGE_DELAY_MS", "250")?,
        flight_api_base_url: or_default(
            "TRIPFARE_FLIGHT_API_BASE_URL",
            "https://api.flight-prices.example.com",
        ),
        flight_api_key: optional("TRIPFARE_FLIGHT_API_KEY"),
        flight_source: or_default("TRIPFARE_FLIGHT_SOURCE", "serp"),
        flight_carry_on_only: parse_bool("TRIPFARE_FLIGHT_CARRY_ON_ONLY", "false")?,
        flight_timeout_secs: parse_u64("TRIPFARE_FLIGHT_TIMEOUT_SECS", "60")?,
        flight_batch_size: parse_usize("TRIPFARE_FLIGHT_BATCH_SIZE", "5")?,
        flight_inter_batch_delay_ms: parse_u64("TRIPFARE_FLIGHT_INTER_BATCH_DELAY_MS", "500")?,
        flight_max_retries: parse_u32("TRIPFARE_FLIGHT_MAX_RETRIES", "2")?,
        flight_retry_backoff_base_ms: parse_u64("TRIPFARE_FLIGHT_RETRY_BACKOFF_BASE_MS", "1000")?,
        exchange_rates: ExchangeRates::from_env_str(&or_default(
            "TRIPFARE_EXCHANGE_RATES",
            "USD=1.28,EUR=1.17",
        )),
    })
}
