//! Weekly flight-price refresh for auto-refresh packages.
//!
//! For each package the job re-syncs departures from the supplier's
//! availability feed, fans out flight searches over the known departure
//! dates, stores a combined price per (rate, airport), and recomputes the
//! package lead prices. Packages are processed one at a time with a pause in
//! between to stay friendly to both upstream APIs.

use std::time::Duration;

use anyhow::Context;
use chrono::{Days, NaiveDate, Utc};
use sqlx::PgPool;

use tripfare_core::{combine, AppConfig, CatalogCache, Currency};
use tripfare_flights::{
    search_combined, BatchSettings, FlightClient, FlightTopology, SearchParams,
};
use tripfare_supplier::{normalize_availability, SupplierClient};

const INTER_PACKAGE_DELAY_SECS: u64 = 2;

/// Fallback search window when a config has no explicit end date.
const DEFAULT_WINDOW_DAYS: u64 = 180;

#[derive(Debug, Default)]
pub(super) struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub rows_updated: usize,
}

/// Reprice every auto-refresh package in turn.
///
/// A package failing any step is logged and counted; it never aborts the
/// packages after it.
pub(super) async fn run(
    pool: &PgPool,
    cache: &CatalogCache,
    supplier: &SupplierClient,
    flights: &FlightClient,
    config: &AppConfig,
) -> RunSummary {
    let mut summary = RunSummary::default();

    let packages = match tripfare_db::list_auto_refresh_packages(pool).await {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(error = %e, "flight refresh: failed to load packages");
            return summary;
        }
    };

    if packages.is_empty() {
        tracing::info!("flight refresh: no packages with auto_refresh_enabled; skipping");
        return summary;
    }

    let last = packages.len() - 1;
    for (i, package) in packages.iter().enumerate() {
        match refresh_package(pool, cache, supplier, flights, config, package).await {
            Ok(rows) => {
                summary.succeeded += 1;
                summary.rows_updated += rows;
                tracing::info!(package = %package.slug, rows, "flight refresh: package repriced");
            }
            Err(e) => {
                summary.failed += 1;
                tracing::error!(package = %package.slug, error = %e, "flight refresh: package failed");
            }
        }

        if i < last {
            tokio::time::sleep(Duration::from_secs(INTER_PACKAGE_DELAY_SECS)).await;
        }
    }

    summary
}

/// Full refresh pipeline for one package. Returns the number of
/// (rate, airport) price rows written.
async fn refresh_package(
    pool: &PgPool,
    cache: &CatalogCache,
    supplier: &SupplierClient,
    flights: &FlightClient,
    config: &AppConfig,
    package: &tripfare_db::PackageRow,
) -> anyhow::Result<usize> {
    let pricing_config = tripfare_db::get_pricing_config(pool, package.id)
        .await
        .context("load pricing config")?
        .context("no flight pricing config")?;

    let airports = pricing_config.airport_list();
    if airports.is_empty() {
        anyhow::bail!("pricing config lists no departure airports");
    }

    let today = Utc::now().date_naive();
    let window_start = pricing_config.search_start.unwrap_or(today);
    let window_end = pricing_config.search_end.unwrap_or_else(|| {
        window_start
            .checked_add_days(Days::new(DEFAULT_WINDOW_DAYS))
            .unwrap_or(window_start)
    });

    // Re-sync departures from the supplier before pricing, so flights are
    // searched against dates that actually exist.
    let raw = supplier
        .get_availability(
            &package.supplier_product_id,
            window_start,
            window_end,
            Currency::Gbp,
        )
        .await
        .context("fetch availability")?;

    let duration_text = cache
        .get(Currency::Gbp)
        .into_iter()
        .find(|p| p.id == package.supplier_product_id)
        .and_then(|p| p.duration_text);
    let normalized = normalize_availability(&raw, duration_text.as_deref(), &config.exchange_rates);

    let (departure_count, rate_count) =
        tripfare_db::replace_departures_for_package(pool, package.id, &normalized.departures)
            .await
            .context("replace departures")?;
    tracing::info!(
        package = %package.slug,
        departures = departure_count,
        rates = rate_count,
        "flight refresh: departures synced"
    );

    if let Some(nights) = normalized.duration_nights {
        tripfare_db::set_package_duration_nights(pool, package.id, nights)
            .await
            .context("store duration")?;
    }

    let nights = normalized
        .duration_nights
        .or(package.duration_nights)
        .unwrap_or(pricing_config.nights);

    let dates: Vec<NaiveDate> = normalized.departures.iter().map(|d| d.date).collect();
    let params = SearchParams {
        depart_airports: airports,
        arrive_airport: pricing_config.destination_airport.clone(),
        nights: i64::from(nights),
        start_date: window_start,
        end_date: window_end,
        specific_dates: if dates.is_empty() { None } else { Some(dates) },
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
        batch_size: config.flight_batch_size,
        inter_batch_delay_ms: config.flight_inter_batch_delay_ms,
    };

    let prices = search_combined(flights, &topology, &params, &batch)
        .await
        .context("flight search")?;

    let source = flights.source().as_str();
    let mut rows = 0usize;
    let departures = tripfare_db::list_departures_with_rates(pool, package.id)
        .await
        .context("load departures for pricing")?;
    for with_rates in &departures {
        let Some(airport_prices) = prices.get(&with_rates.departure.departure_date) else {
            continue;
        };
        for rate in &with_rates.rates {
            for (airport, &flight_price) in airport_prices {
                let breakdown =
                    combine(flight_price, rate.price_gbp, pricing_config.markup_percent);
                tripfare_db::upsert_rate_flight_price(
                    pool,
                    rate.id,
                    airport,
                    flight_price,
                    breakdown.final_price,
                    pricing_config.markup_percent,
                    source,
                )
                .await
                .context("store combined price")?;
                rows += 1;
            }
        }
    }

    let lead = tripfare_db::update_package_lead_price(pool, package.id)
        .await
        .context("recompute lead price")?;
    if lead.updated {
        tracing::info!(
            package = %package.slug,
            price = ?lead.new_price,
            single = ?lead.new_single_price,
            "flight refresh: lead price updated"
        );
    }

    Ok(rows)
}
