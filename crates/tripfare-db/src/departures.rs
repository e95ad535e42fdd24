//! Database operations for `departures` and `rates`.
//!
//! A sync replaces a package's full departure set — delete then insert in
//! one transaction — so the tables never hold a partial merge of old and
//! new supplier data. Rates are children of departures and go with them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `departures` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DepartureRow {
    pub id: i64,
    pub package_id: i64,
    pub departure_date: NaiveDate,
    pub start_time: Option<String>,
    pub total_capacity: Option<i32>,
    pub available_capacity: Option<i32>,
    pub sold_out: bool,
}

/// A row from the `rates` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RateRow {
    pub id: i64,
    pub departure_id: i64,
    pub supplier_rate_id: String,
    pub title: String,
    pub room_category: String,
    pub hotel_category: Option<String>,
    pub min_occupancy: Option<i32>,
    pub max_occupancy: Option<i32>,
    pub original_price: Decimal,
    pub original_currency: String,
    pub price_gbp: Decimal,
}

/// One departure with its rate tiers, as the orchestrator consumes them.
#[derive(Debug, Clone)]
pub struct DepartureWithRates {
    pub departure: DepartureRow,
    pub rates: Vec<RateRow>,
}

/// Replaces the full departure set for a package.
///
/// Deletes every existing departure (rates cascade) and inserts the new set
/// inside one transaction, so readers see the old complete set or the new
/// complete set. Returns `(departures, rates)` inserted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails; the transaction rolls
/// back and the previous departure set survives.
pub async fn replace_departures_for_package(
    pool: &PgPool,
    package_id: i64,
    departures: &[tripfare_core::Departure],
) -> Result<(usize, usize), DbError> {
    let mut tx = pool.begin().await.map_err(DbError::Sqlx)?;

    sqlx::query("DELETE FROM departures WHERE package_id = $1")
        .bind(package_id)
        .execute(&mut *tx)
        .await?;

    let mut rate_count = 0usize;
    for departure in departures {
        let departure_id: i64 = sqlx::query_scalar::<_, i64>(
            "INSERT INTO departures \
             (package_id, departure_date, start_time, total_capacity, available_capacity, sold_out) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id",
        )
        .bind(package_id)
        .bind(departure.date)
        .bind(&departure.start_time)
        .bind(departure.total_capacity)
        .bind(departure.available_capacity)
        .bind(departure.sold_out)
        .fetch_one(&mut *tx)
        .await?;

        for rate in &departure.rates {
            sqlx::query(
                "INSERT INTO rates \
                 (departure_id, supplier_rate_id, title, room_category, hotel_category, \
                  min_occupancy, max_occupancy, original_price, original_currency, price_gbp) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
            )
            .bind(departure_id)
            .bind(&rate.supplier_rate_id)
            .bind(&rate.title)
            .bind(rate.room_category.as_str())
            .bind(&rate.hotel_category)
            .bind(rate.min_occupancy)
            .bind(rate.max_occupancy)
            .bind(rate.original_price)
            .bind(&rate.original_currency)
            .bind(rate.price_gbp)
            .execute(&mut *tx)
            .await?;
            rate_count += 1;
        }
    }

    tx.commit().await.map_err(DbError::Sqlx)?;
    Ok((departures.len(), rate_count))
}

/// Loads a package's departures in date order, each with its rates.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either query fails.
pub async fn list_departures_with_rates(
    pool: &PgPool,
    package_id: i64,
) -> Result<Vec<DepartureWithRates>, DbError> {
    let departures: Vec<DepartureRow> = sqlx::query_as(
        "SELECT id, package_id, departure_date, start_time, total_capacity, \
                available_capacity, sold_out \
         FROM departures WHERE package_id = $1 ORDER BY departure_date",
    )
    .bind(package_id)
    .fetch_all(pool)
    .await?;

    if departures.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = departures.iter().map(|d| d.id).collect();
    let rates: Vec<RateRow> = sqlx::query_as(
        "SELECT id, departure_id, supplier_rate_id, title, room_category, hotel_category, \
                min_occupancy, max_occupancy, original_price, original_currency, price_gbp \
         FROM rates WHERE departure_id = ANY($1) ORDER BY id",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let mut out: Vec<DepartureWithRates> = departures
        .into_iter()
        .map(|departure| DepartureWithRates {
            departure,
            rates: Vec::new(),
        })
        .collect();

    for rate in rates {
        if let Some(entry) = out.iter_mut().find(|d| d.departure.id == rate.departure_id) {
            entry.rates.push(rate);
        }
    }

    Ok(out)
}
