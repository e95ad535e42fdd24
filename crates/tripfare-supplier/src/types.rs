//! Raw supplier payload shapes.
//!
//! Everything here is deliberately loose: optional fields, defaults, and
//! tolerant numeric types. The supplier's JSON drifts, and a missing field
//! must degrade to a missing price, never a deserialization failure.

use rust_decimal::Decimal;
use serde::Deserialize;

/// One page of the supplier's catalog search.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSearchResponse {
    #[serde(default)]
    pub items: Vec<RawCatalogItem>,
    #[serde(default)]
    pub total_hits: u64,
}

/// A catalog listing item as the supplier returns it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCatalogItem {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub price: Option<Decimal>,
    pub location: Option<String>,
    /// Free text, e.g. "8 days" or "1 week".
    pub duration: Option<String>,
    #[serde(default)]
    pub photos: Vec<RawPhoto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPhoto {
    pub url: Option<String>,
}

/// One availability date for a product. Carries one or both of
/// `prices_by_rate` (preferred, per-pricing-category breakdown) and `rates`
/// (flat metadata with an optional fallback price).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAvailability {
    pub date: chrono::NaiveDate,
    pub start_time: Option<String>,
    pub total_capacity: Option<i32>,
    pub available_capacity: Option<i32>,
    #[serde(default)]
    pub sold_out: bool,
    #[serde(default)]
    pub prices_by_rate: Vec<RawPriceByRate>,
    #[serde(default)]
    pub rates: Vec<RawRate>,
}

/// Rate metadata (and fallback price) from the `rates` array.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRate {
    pub id: String,
    pub title: Option<String>,
    pub min_per_booking: Option<i32>,
    pub max_per_booking: Option<i32>,
    pub price: Option<RawPrice>,
}

/// A priced entry from the `pricesByRate` array.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPriceByRate {
    pub rate_id: String,
    #[serde(default)]
    pub pricing_category_prices: Vec<RawCategoryPrice>,
    pub total: Option<RawPrice>,
}

/// A per-category price line (adult, child, ...).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCategoryPrice {
    pub category: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
}

/// An amount plus its currency; either half may be absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPrice {
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
}
