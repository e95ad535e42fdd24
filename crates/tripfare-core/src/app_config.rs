use std::net::SocketAddr;

use crate::currency::ExchangeRates;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub supplier_base_url: String,
    pub supplier_api_key: Option<String>,
    pub supplier_shared_secret: Option<String>,
    pub supplier_timeout_secs: u64,
    pub catalog_page_size: u32,
    pub catalog_inter_page_delay_ms: u64,
    pub flight_api_base_url: String,
    pub flight_api_key: Option<String>,
    /// Which flight backend the prices are attributed to ("serp" or "sunshine").
    pub flight_source: String,
    /// The backend prices carry-on baggage only; fares get the fixed
    /// checked-bag surcharge when set.
    pub flight_carry_on_only: bool,
    pub flight_timeout_secs: u64,
    pub flight_batch_size: usize,
    pub flight_inter_batch_delay_ms: u64,
    pub flight_max_retries: u32,
    pub flight_retry_backoff_base_ms: u64,
    pub exchange_rates: ExchangeRates,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("supplier_base_url", &self.supplier_base_url)
            .field(
                "supplier_api_key",
                &self.supplier_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "supplier_shared_secret",
                &self.supplier_shared_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("supplier_timeout_secs", &self.supplier_timeout_secs)
            .field("catalog_page_size", &self.catalog_page_size)
            .field("catalog_inter_page_delay_ms", &self.catalog_inter_page_delay_ms)
            .field("flight_api_base_url", &self.flight_api_base_url)
            .field(
                "flight_api_key",
                &self.flight_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("flight_source", &self.flight_source)
            .field("flight_carry_on_only", &self.flight_carry_on_only)
            .field("flight_timeout_secs", &self.flight_timeout_secs)
            .field("flight_batch_size", &self.flight_batch_size)
            .field("flight_inter_batch_delay_ms", &self.flight_inter_batch_delay_ms)
            .field("flight_max_retries", &self.flight_max_retries)
            .field(
                "flight_retry_backoff_base_ms",
                &self.flight_retry_backoff_base_ms,
            )
            .field("exchange_rates", &self.exchange_rates)
            .finish()
    }
}
