//! Storefront catalog endpoints backed by the per-currency cache.
//!
//! A warm cache serves straight from memory. On a miss the first supplier
//! page is fetched inline so the storefront gets something to render, and the
//! remaining pages are walked in a detached task that overwrites the snapshot
//! when complete.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use tripfare_core::{CacheMetadata, CachedProduct, Currency};
use tripfare_supplier::{fetch_catalog_page, fetch_remaining_pages};

use super::{ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct CatalogQuery {
    currency: Option<String>,
}

fn parse_currency(raw: Option<&str>, request_id: &str) -> Result<Currency, ApiError> {
    match raw {
        None => Ok(Currency::Gbp),
        Some(code) => Currency::from_code(code).ok_or_else(|| {
            ApiError::new(
                request_id.to_string(),
                "validation_error",
                format!("unsupported currency '{code}'"),
            )
        }),
    }
}

pub(super) async fn list_catalog(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<CatalogQuery>,
) -> Result<Json<ApiResponse<Vec<CachedProduct>>>, ApiError> {
    let currency = parse_currency(params.currency.as_deref(), &req_id.0)?;

    if !state.cache.is_expired(currency) {
        return Ok(Json(ApiResponse {
            data: state.cache.get(currency),
            meta: ResponseMeta::new(req_id.0),
        }));
    }

    // Cold or expired: serve the first page now, finish the walk off-request.
    let first_page = fetch_catalog_page(
        &state.supplier,
        1,
        state.config.catalog_page_size,
        currency,
    )
    .await
    .map_err(|e| {
        tracing::error!(currency = %currency, error = %e, "catalog first-page fetch failed");
        ApiError::new(req_id.0.clone(), "upstream_error", "supplier catalog unavailable")
    })?;

    let items = first_page.items.clone();
    state.cache.set(items.clone(), currency);

    let supplier = std::sync::Arc::clone(&state.supplier);
    let cache = std::sync::Arc::clone(&state.cache);
    let page_size = state.config.catalog_page_size;
    let delay_ms = state.config.catalog_inter_page_delay_ms;
    tokio::spawn(async move {
        match fetch_remaining_pages(&supplier, currency, page_size, delay_ms, first_page).await {
            Ok(full) => {
                tracing::info!(currency = %currency, products = full.len(), "catalog walk complete");
                cache.set(full, currency);
            }
            Err(e) => {
                // The first page stays cached; the next request retries the walk
                // once that partial snapshot expires or is replaced.
                tracing::error!(currency = %currency, error = %e, "background catalog walk failed");
            }
        }
    });

    Ok(Json(ApiResponse {
        data: items,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn catalog_metadata(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<CatalogQuery>,
) -> Result<Json<ApiResponse<CacheMetadata>>, ApiError> {
    let currency = parse_currency(params.currency.as_deref(), &req_id.0)?;

    state
        .cache
        .metadata(currency)
        .map(|metadata| {
            Json(ApiResponse {
                data: metadata,
                meta: ResponseMeta::new(req_id.0.clone()),
            })
        })
        .ok_or_else(|| {
            ApiError::new(
                req_id.0,
                "not_found",
                format!("catalog for {currency} has never been loaded"),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_currency_defaults_to_gbp() {
        assert_eq!(parse_currency(None, "req-1").expect("gbp"), Currency::Gbp);
    }

    #[test]
    fn currency_codes_parse_case_insensitively() {
        assert_eq!(
            parse_currency(Some("eur"), "req-1").expect("eur"),
            Currency::Eur
        );
    }

    #[test]
    fn unknown_currency_is_a_validation_error() {
        let err = parse_currency(Some("JPY"), "req-1").expect_err("unsupported");
        assert_eq!(err.error.code, "validation_error");
    }
}
