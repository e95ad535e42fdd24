//! Database operations for `packages`, including lead-price recomputation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `packages` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PackageRow {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub supplier_product_id: String,
    pub duration_nights: Option<i32>,
    pub auto_refresh_enabled: bool,
    pub lead_price: Option<Decimal>,
    pub single_lead_price: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const PACKAGE_COLUMNS: &str = "id, slug, title, supplier_product_id, duration_nights, \
                               auto_refresh_enabled, lead_price, single_lead_price, \
                               created_at, updated_at";

/// Result of a lead-price recomputation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadPriceUpdate {
    /// True when either lead price changed.
    pub updated: bool,
    pub new_price: Option<Decimal>,
    pub new_single_price: Option<Decimal>,
}

/// Every package opted into the weekly flight-price refresh.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_auto_refresh_packages(pool: &PgPool) -> Result<Vec<PackageRow>, DbError> {
    let rows = sqlx::query_as::<_, PackageRow>(&format!(
        "SELECT {PACKAGE_COLUMNS} FROM packages WHERE auto_refresh_enabled ORDER BY id"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Looks up a package by the supplier's product id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_package_by_supplier_product(
    pool: &PgPool,
    supplier_product_id: &str,
) -> Result<Option<PackageRow>, DbError> {
    let row = sqlx::query_as::<_, PackageRow>(&format!(
        "SELECT {PACKAGE_COLUMNS} FROM packages WHERE supplier_product_id = $1"
    ))
    .bind(supplier_product_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Stores the night count derived from the supplier's duration text.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn set_package_duration_nights(
    pool: &PgPool,
    package_id: i64,
    nights: i32,
) -> Result<(), DbError> {
    sqlx::query("UPDATE packages SET duration_nights = $2, updated_at = now() WHERE id = $1")
        .bind(package_id)
        .bind(nights)
        .execute(pool)
        .await?;
    Ok(())
}

/// Recomputes and persists a package's advertised lead prices.
///
/// The lead price is the minimum twin-rate combined price across every
/// departure and airport; the single-occupancy lead is computed the same
/// way over single rates. Both may be `NULL` when no flight prices exist.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] for an unknown package, or
/// [`DbError::Sqlx`] if a query fails.
pub async fn update_package_lead_price(
    pool: &PgPool,
    package_id: i64,
) -> Result<LeadPriceUpdate, DbError> {
    let current: Option<(Option<Decimal>, Option<Decimal>)> =
        sqlx::query_as("SELECT lead_price, single_lead_price FROM packages WHERE id = $1")
            .bind(package_id)
            .fetch_optional(pool)
            .await?;
    let Some((old_price, old_single)) = current else {
        return Err(DbError::NotFound);
    };

    let new_price = min_combined_for_category(pool, package_id, "twin").await?;
    let new_single_price = min_combined_for_category(pool, package_id, "single").await?;

    sqlx::query(
        "UPDATE packages SET lead_price = $2, single_lead_price = $3, updated_at = now() \
         WHERE id = $1",
    )
    .bind(package_id)
    .bind(new_price)
    .bind(new_single_price)
    .execute(pool)
    .await?;

    Ok(LeadPriceUpdate {
        updated: new_price != old_price || new_single_price != old_single,
        new_price,
        new_single_price,
    })
}

async fn min_combined_for_category(
    pool: &PgPool,
    package_id: i64,
    room_category: &str,
) -> Result<Option<Decimal>, DbError> {
    let min: Option<Decimal> = sqlx::query_scalar(
        "SELECT MIN(rfp.combined_price) \
         FROM rate_flight_prices rfp \
         JOIN rates r ON r.id = rfp.rate_id \
         JOIN departures d ON d.id = r.departure_id \
         WHERE d.package_id = $1 AND r.room_category = $2",
    )
    .bind(package_id)
    .bind(room_category)
    .fetch_one(pool)
    .await?;
    Ok(min)
}
