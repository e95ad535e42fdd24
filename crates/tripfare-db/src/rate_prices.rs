//! Database operations for `rate_flight_prices`.
//!
//! At most one row exists per (rate, airport); a re-fetch overwrites in
//! place. Last writer wins — the weekly batch and any manual refresh may
//! race without harm.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `rate_flight_prices` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RateFlightPriceRow {
    pub id: i64,
    pub rate_id: i64,
    pub airport_code: String,
    pub flight_price: Decimal,
    pub combined_price: Decimal,
    pub markup_percent: Decimal,
    pub flight_source: String,
    pub updated_at: DateTime<Utc>,
}

/// Upserts the computed prices for one (rate, airport) pair.
///
/// Returns the stored row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_rate_flight_price(
    pool: &PgPool,
    rate_id: i64,
    airport_code: &str,
    flight_price: Decimal,
    combined_price: Decimal,
    markup_percent: Decimal,
    flight_source: &str,
) -> Result<RateFlightPriceRow, DbError> {
    let row = sqlx::query_as::<_, RateFlightPriceRow>(
        "INSERT INTO rate_flight_prices \
         (rate_id, airport_code, flight_price, combined_price, markup_percent, flight_source) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         ON CONFLICT (rate_id, airport_code) DO UPDATE SET \
           flight_price = EXCLUDED.flight_price, \
           combined_price = EXCLUDED.combined_price, \
           markup_percent = EXCLUDED.markup_percent, \
           flight_source = EXCLUDED.flight_source, \
           updated_at = now() \
         RETURNING id, rate_id, airport_code, flight_price, combined_price, markup_percent, \
                   flight_source, updated_at",
    )
    .bind(rate_id)
    .bind(airport_code)
    .bind(flight_price)
    .bind(combined_price)
    .bind(markup_percent)
    .bind(flight_source)
    .fetch_one(pool)
    .await?;
    Ok(row)
}
