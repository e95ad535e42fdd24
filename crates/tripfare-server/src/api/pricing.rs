//! On-demand combined flight + land pricing for one tour.
//!
//! The land price comes from the GBP catalog cache; the flight side runs the
//! same fan-out the weekly refresh uses. A request for a single date still
//! returns every configured departure airport for that date.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tripfare_core::{combine, Currency};
use tripfare_flights::{
    airport_display_name, search_combined, BatchSettings, FlightError, FlightTopology, SearchParams,
};

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct PricesQuery {
    date: Option<NaiveDate>,
}

/// One priced (date, airport) combination.
#[derive(Debug, Serialize)]
pub(super) struct CombinedPriceItem {
    pub date: NaiveDate,
    pub airport: String,
    pub airport_name: String,
    pub flight_price: Decimal,
    pub land_price: Decimal,
    pub subtotal: Decimal,
    pub markup_percent: Decimal,
    pub with_markup: Decimal,
    pub final_price: Decimal,
    pub currency: String,
}

pub(super) async fn combined_prices(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(product_id): Path<String>,
    Query(params): Query<PricesQuery>,
) -> Result<Json<ApiResponse<Vec<CombinedPriceItem>>>, ApiError> {
    let package = tripfare_db::get_package_by_supplier_product(&state.pool, &product_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("no package for tour '{product_id}'"),
            )
        })?;

    let pricing_config = tripfare_db::get_pricing_config(&state.pool, package.id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("package '{}' has no flight pricing config", package.slug),
            )
        })?;

    // Land price must come from the GBP snapshot; quoting against a stale or
    // missing catalog would silently misprice the package.
    let land_price = state
        .cache
        .get(Currency::Gbp)
        .into_iter()
        .find(|p| p.id == product_id)
        .map(|p| p.price)
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("tour '{product_id}' is not in the GBP catalog cache"),
            )
        })?;

    let specific_dates = match params.date {
        Some(date) => Some(vec![date]),
        None => {
            let departures = tripfare_db::list_departures_with_rates(&state.pool, package.id)
                .await
                .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
            let dates: Vec<NaiveDate> = departures
                .iter()
                .map(|d| d.departure.departure_date)
                .collect();
            if dates.is_empty() {
                None
            } else {
                Some(dates)
            }
        }
    };

    let today = Utc::now().date_naive();
    let search_params = SearchParams {
        depart_airports: pricing_config.airport_list(),
        arrive_airport: pricing_config.destination_airport.clone(),
        nights: i64::from(package.duration_nights.unwrap_or(pricing_config.nights)),
        start_date: pricing_config.search_start.unwrap_or(today),
        end_date: pricing_config
            .search_end
            .unwrap_or_else(|| today.checked_add_days(Days::new(30)).unwrap_or(today)),
        specific_dates,
    };
    let topology = if pricing_config.open_jaw {
        FlightTopology::OpenJaw {
            return_airport: pricing_config
                .return_departure_airport
                .clone()
                .unwrap_or_default(),
        }
    } else {
        FlightTopology::RoundTrip
    };
    let batch = BatchSettings {
        batch_size: state.config.flight_batch_size,
        inter_batch_delay_ms: state.config.flight_inter_batch_delay_ms,
    };

    let prices = search_combined(&state.flights, &topology, &search_params, &batch)
        .await
        .map_err(|e| match e {
            FlightError::InvalidRequest(reason) => {
                ApiError::new(req_id.0.clone(), "validation_error", reason)
            }
            other => {
                tracing::error!(package = %package.slug, error = %other, "flight search failed");
                ApiError::new(
                    req_id.0.clone(),
                    "upstream_error",
                    "flight price search failed",
                )
            }
        })?;

    let markup = pricing_config.markup_percent;
    let items: Vec<CombinedPriceItem> = prices
        .iter()
        .flat_map(|(&date, airports)| {
            airports.iter().map(move |(airport, &flight_price)| {
                let breakdown = combine(flight_price, land_price, markup);
                CombinedPriceItem {
                    date,
                    airport: airport.clone(),
                    airport_name: airport_display_name(airport).to_string(),
                    flight_price,
                    land_price,
                    subtotal: breakdown.subtotal,
                    markup_percent: markup,
                    with_markup: breakdown.with_markup,
                    final_price: breakdown.final_price,
                    currency: Currency::Gbp.code().to_string(),
                }
            })
        })
        .collect();

    Ok(Json(ApiResponse {
        data: items,
        meta: ResponseMeta::new(req_id.0),
    }))
}
