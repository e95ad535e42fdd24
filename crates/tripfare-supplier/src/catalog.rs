//! Paged catalog fetch loops.
//!
//! The supplier pages its catalog; these helpers walk the pages with an
//! inter-page delay and a hard page cap, mapping raw items into
//! [`CachedProduct`]s for the per-currency cache. The two-phase variant
//! ([`fetch_remaining_pages`]) backs the cold-cache "fast first page, lazy
//! rest" path: the caller caches page one synchronously and finishes the
//! walk in a detached task.

use std::time::Duration;

use rust_decimal::Decimal;

use tripfare_core::{CachedProduct, Currency};

use crate::client::SupplierClient;
use crate::error::SupplierError;
use crate::types::RawCatalogItem;

/// Hard safety cap on catalog pages per currency.
pub const MAX_CATALOG_PAGES: usize = 50;

/// One mapped catalog page plus the supplier's reported total.
#[derive(Debug, Clone)]
pub struct CatalogPage {
    pub items: Vec<CachedProduct>,
    pub total_hits: u64,
}

/// Fetches and maps a single catalog page.
///
/// # Errors
///
/// Propagates any [`SupplierError`] from the underlying request.
pub async fn fetch_catalog_page(
    client: &SupplierClient,
    page: u32,
    page_size: u32,
    currency: Currency,
) -> Result<CatalogPage, SupplierError> {
    let response = client.search_catalog(page, page_size, currency).await?;
    Ok(CatalogPage {
        items: response
            .items
            .into_iter()
            .map(|item| map_item(item, currency))
            .collect(),
        total_hits: response.total_hits,
    })
}

/// Walks every catalog page for `currency` and returns the full item list.
///
/// **All-or-nothing**: a failure on any page discards earlier pages and
/// returns the error, so the cache is only ever replaced with a complete
/// snapshot.
///
/// # Errors
///
/// Propagates request errors; returns [`SupplierError::PaginationLimit`] if
/// the walk exceeds [`MAX_CATALOG_PAGES`].
pub async fn fetch_full_catalog(
    client: &SupplierClient,
    currency: Currency,
    page_size: u32,
    inter_page_delay_ms: u64,
) -> Result<Vec<CachedProduct>, SupplierError> {
    let first = fetch_catalog_page(client, 1, page_size, currency).await?;
    fetch_remaining_pages(client, currency, page_size, inter_page_delay_ms, first).await
}

/// Continues a catalog walk after the first page and returns the merged list.
///
/// # Errors
///
/// Propagates request errors; returns [`SupplierError::PaginationLimit`] if
/// the walk exceeds [`MAX_CATALOG_PAGES`].
pub async fn fetch_remaining_pages(
    client: &SupplierClient,
    currency: Currency,
    page_size: u32,
    inter_page_delay_ms: u64,
    first_page: CatalogPage,
) -> Result<Vec<CachedProduct>, SupplierError> {
    let total_hits = usize::try_from(first_page.total_hits).unwrap_or(usize::MAX);
    let mut all_items = first_page.items;
    let mut page = 1usize;

    while all_items.len() < total_hits {
        page += 1;
        if page > MAX_CATALOG_PAGES {
            return Err(SupplierError::PaginationLimit {
                currency: currency.code().to_string(),
                max_pages: MAX_CATALOG_PAGES,
            });
        }

        if inter_page_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(inter_page_delay_ms)).await;
        }

        let next = fetch_catalog_page(
            client,
            u32::try_from(page).unwrap_or(u32::MAX),
            page_size,
            currency,
        )
        .await?;

        if next.items.is_empty() {
            // The supplier's total over-reported; stop rather than spin.
            tracing::warn!(
                currency = %currency,
                page,
                collected = all_items.len(),
                total_hits,
                "catalog page came back empty before reaching totalHits"
            );
            break;
        }
        all_items.extend(next.items);
    }

    Ok(all_items)
}

fn map_item(item: RawCatalogItem, currency: Currency) -> CachedProduct {
    CachedProduct {
        id: item.id,
        title: item.title,
        price: item.price.unwrap_or(Decimal::ZERO),
        currency,
        location: item.location,
        duration_text: item.duration,
        photo_urls: item.photos.into_iter().filter_map(|p| p.url).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawPhoto;

    #[test]
    fn map_item_defaults_missing_price_to_zero() {
        let item = RawCatalogItem {
            id: "p1".to_string(),
            title: "Highlights of Peru".to_string(),
            price: None,
            location: Some("Peru".to_string()),
            duration: Some("10 days".to_string()),
            photos: vec![
                RawPhoto {
                    url: Some("https://img.example.com/1.jpg".to_string()),
                },
                RawPhoto { url: None },
            ],
        };
        let mapped = map_item(item, Currency::Usd);
        assert_eq!(mapped.price, Decimal::ZERO);
        assert_eq!(mapped.currency, Currency::Usd);
        assert_eq!(mapped.photo_urls.len(), 1);
    }
}
