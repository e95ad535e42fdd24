//! Signed HTTP client and normalization layer for the tour supplier API.
//!
//! The supplier exposes a paged product catalog and a per-product
//! availability feed. Requests carry a timestamped HMAC signature. Raw
//! availability payloads are loosely typed; [`normalize`] flattens them into
//! the `Departure`/`Rate` model the rest of the engine works with.

mod catalog;
mod client;
mod error;
mod normalize;
mod types;

pub use catalog::{
    fetch_catalog_page, fetch_full_catalog, fetch_remaining_pages, CatalogPage, MAX_CATALOG_PAGES,
};
pub use client::SupplierClient;
pub use error::SupplierError;
pub use normalize::{normalize_availability, NormalizedAvailability};
pub use types::{
    CatalogSearchResponse, RawAvailability, RawCatalogItem, RawCategoryPrice, RawPrice,
    RawPriceByRate, RawRate,
};
