//! Pure pricing-map logic: cheapest-offer reduction and open-jaw pairing.
//!
//! Kept free of network code so the date/airport pairing rules stay
//! independently testable.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;

use crate::types::DateAirportPrices;

/// Records `price` for `(date, airport)` only if it is strictly cheaper than
/// anything already seen for that key. Ties keep the first-seen offer.
pub fn reduce_cheapest(acc: &mut DateAirportPrices, date: NaiveDate, airport: &str, price: Decimal) {
    let by_airport = acc.entry(date).or_default();
    match by_airport.get(airport) {
        Some(existing) if price >= *existing => {}
        _ => {
            by_airport.insert(airport.to_string(), price);
        }
    }
}

/// Pairs outbound and return cheapest maps into combined open-jaw prices.
///
/// `returns` is keyed by the *return* date; an outbound on `d` pairs with the
/// return on `d + nights`, and only at the same UK airport. A date/airport
/// with only one leg priced produces no combined price.
#[must_use]
pub fn pair_open_jaw(
    outbound: &DateAirportPrices,
    returns: &DateAirportPrices,
    nights: i64,
) -> DateAirportPrices {
    let mut combined = DateAirportPrices::new();
    let nights_u64 = u64::try_from(nights.max(0)).unwrap_or(0);

    for (depart_date, airports) in outbound {
        let Some(return_date) = depart_date.checked_add_days(Days::new(nights_u64)) else {
            continue;
        };
        let Some(return_airports) = returns.get(&return_date) else {
            continue;
        };
        for (airport, out_price) in airports {
            if let Some(ret_price) = return_airports.get(airport) {
                combined
                    .entry(*depart_date)
                    .or_default()
                    .insert(airport.clone(), *out_price + *ret_price);
            }
        }
    }

    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().expect("valid date")
    }

    fn d(v: i64) -> Decimal {
        Decimal::from(v)
    }

    #[test]
    fn reduction_keeps_the_minimum_price() {
        let mut acc = DateAirportPrices::new();
        for price in [120, 95, 130] {
            reduce_cheapest(&mut acc, date("2025-06-01"), "LGW", d(price));
        }
        assert_eq!(acc[&date("2025-06-01")]["LGW"], d(95));
    }

    #[test]
    fn reduction_keeps_first_seen_on_tie() {
        let mut acc = DateAirportPrices::new();
        reduce_cheapest(&mut acc, date("2025-06-01"), "LGW", d(100));
        reduce_cheapest(&mut acc, date("2025-06-01"), "LGW", d(100));
        assert_eq!(acc[&date("2025-06-01")]["LGW"], d(100));
    }

    #[test]
    fn reduction_is_independent_per_airport_and_date() {
        let mut acc = DateAirportPrices::new();
        reduce_cheapest(&mut acc, date("2025-06-01"), "LGW", d(100));
        reduce_cheapest(&mut acc, date("2025-06-01"), "MAN", d(80));
        reduce_cheapest(&mut acc, date("2025-06-08"), "LGW", d(60));
        assert_eq!(acc[&date("2025-06-01")]["LGW"], d(100));
        assert_eq!(acc[&date("2025-06-01")]["MAN"], d(80));
        assert_eq!(acc[&date("2025-06-08")]["LGW"], d(60));
    }

    #[test]
    fn open_jaw_pairs_exact_date_and_airport() {
        let mut outbound = DateAirportPrices::new();
        reduce_cheapest(&mut outbound, date("2025-06-01"), "LGW", d(100));

        let mut returns = DateAirportPrices::new();
        reduce_cheapest(&mut returns, date("2025-06-08"), "LGW", d(150));

        let combined = pair_open_jaw(&outbound, &returns, 7);
        assert_eq!(combined[&date("2025-06-01")]["LGW"], d(250));
    }

    #[test]
    fn open_jaw_without_matching_return_produces_nothing() {
        let mut outbound = DateAirportPrices::new();
        reduce_cheapest(&mut outbound, date("2025-06-01"), "LGW", d(100));

        // Return exists but on the wrong date for nights=7.
        let mut returns = DateAirportPrices::new();
        reduce_cheapest(&mut returns, date("2025-06-09"), "LGW", d(150));

        assert!(pair_open_jaw(&outbound, &returns, 7).is_empty());
    }

    #[test]
    fn open_jaw_requires_the_same_uk_airport() {
        let mut outbound = DateAirportPrices::new();
        reduce_cheapest(&mut outbound, date("2025-06-01"), "LGW", d(100));
        reduce_cheapest(&mut outbound, date("2025-06-01"), "MAN", d(90));

        let mut returns = DateAirportPrices::new();
        reduce_cheapest(&mut returns, date("2025-06-08"), "MAN", d(110));

        let combined = pair_open_jaw(&outbound, &returns, 7);
        let by_airport = &combined[&date("2025-06-01")];
        assert_eq!(by_airport.get("MAN"), Some(&d(200)));
        assert_eq!(by_airport.get("LGW"), None, "LGW has no return leg");
    }
}
