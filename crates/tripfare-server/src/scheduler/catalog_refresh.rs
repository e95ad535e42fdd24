//! Weekly full-catalog refresh across every supported currency.

use tripfare_core::{AppConfig, CatalogCache, Currency};
use tripfare_supplier::{fetch_full_catalog, SupplierClient};

/// Rebuilds each currency's catalog snapshot in turn.
///
/// Currencies are refreshed independently: a failed walk leaves that
/// currency's existing snapshot in place and moves on to the next one.
pub(super) async fn run(cache: &CatalogCache, supplier: &SupplierClient, config: &AppConfig) {
    for currency in Currency::ALL {
        match fetch_full_catalog(
            supplier,
            currency,
            config.catalog_page_size,
            config.catalog_inter_page_delay_ms,
        )
        .await
        {
            Ok(items) => {
                tracing::info!(
                    currency = %currency,
                    products = items.len(),
                    "catalog refresh: snapshot replaced"
                );
                cache.set(items, currency);
            }
            Err(e) => {
                tracing::error!(
                    currency = %currency,
                    error = %e,
                    "catalog refresh: walk failed; keeping previous snapshot"
                );
            }
        }
    }
}
