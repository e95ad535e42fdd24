//! Shared domain types and pure pricing logic for the tripfare engine.
//!
//! Everything network- and database-free lives here: application
//! configuration, the currency-scoped catalog cache, price combination and
//! smart rounding, duration parsing, and GBP conversion. The supplier,
//! flights, and db crates all build on these types.

mod app_config;
mod catalog_cache;
mod config;
mod currency;
mod duration;
mod pricing;
mod tours;

pub use app_config::{AppConfig, Environment};
pub use catalog_cache::{CacheMetadata, CachedProduct, CatalogCache, Clock, SystemClock};
pub use config::{load_app_config, load_app_config_from_env};
pub use currency::{convert_to_gbp, Currency, ExchangeRates};
pub use duration::parse_duration_to_nights;
pub use pricing::{combine, smart_round, PriceBreakdown};
pub use tours::{infer_hotel_category, infer_room_category, Departure, Rate, RoomCategory};

use thiserror::Error;

/// Errors raised while loading application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
