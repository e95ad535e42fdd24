//! Database operations for `flight_pricing_configs`.
//!
//! Admin-authored and read-only to the pricing engine: which destination
//! airport a package flies into, which UK airports to price from, the trip
//! length, the search window, and the markup.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `flight_pricing_configs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PricingConfigRow {
    pub id: i64,
    pub package_id: i64,
    pub destination_airport: String,
    /// Pipe-delimited airport codes as stored; use [`Self::airport_list`].
    pub departure_airports: String,
    pub return_departure_airport: Option<String>,
    pub nights: i32,
    pub search_start: Option<NaiveDate>,
    pub search_end: Option<NaiveDate>,
    pub markup_percent: Decimal,
    pub open_jaw: bool,
}

impl PricingConfigRow {
    /// Parses the stored pipe-delimited airport list, skipping blanks.
    #[must_use]
    pub fn airport_list(&self) -> Vec<String> {
        self.departure_airports
            .split('|')
            .map(|code| code.trim().to_ascii_uppercase())
            .filter(|code| !code.is_empty())
            .collect()
    }
}

/// Loads the pricing config for a package, if one has been authored.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_pricing_config(
    pool: &PgPool,
    package_id: i64,
) -> Result<Option<PricingConfigRow>, DbError> {
    let row = sqlx::query_as::<_, PricingConfigRow>(
        "SELECT id, package_id, destination_airport, departure_airports, \
                return_departure_airport, nights, search_start, search_end, \
                markup_percent, open_jaw \
         FROM flight_pricing_configs WHERE package_id = $1",
    )
    .bind(package_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(airports: &str) -> PricingConfigRow {
        PricingConfigRow {
            id: 1,
            package_id: 1,
            destination_airport: "AGP".to_string(),
            departure_airports: airports.to_string(),
            return_departure_airport: None,
            nights: 7,
            search_start: None,
            search_end: None,
            markup_percent: Decimal::from(10),
            open_jaw: false,
        }
    }

    #[test]
    fn airport_list_splits_on_pipes() {
        assert_eq!(config("LGW|MAN|EDI").airport_list(), ["LGW", "MAN", "EDI"]);
    }

    #[test]
    fn airport_list_trims_and_uppercases() {
        assert_eq!(config(" lgw | man ").airport_list(), ["LGW", "MAN"]);
    }

    #[test]
    fn airport_list_skips_empty_segments() {
        assert_eq!(config("LGW||MAN|").airport_list(), ["LGW", "MAN"]);
        assert!(config("").airport_list().is_empty());
    }
}
