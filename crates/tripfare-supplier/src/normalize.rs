//! Flattens raw supplier availability into `Departure`/`Rate` records.
//!
//! Price extraction is an ordered chain of named strategies; the first one
//! that yields an amount wins. The order is a contract — reordering it
//! changes observed prices — so it is pinned by tests below.

use std::collections::HashMap;

use rust_decimal::Decimal;

use tripfare_core::{
    convert_to_gbp, infer_hotel_category, infer_room_category, parse_duration_to_nights,
    Departure, ExchangeRates, Rate,
};

use crate::types::{RawAvailability, RawPriceByRate, RawRate};

/// Output of [`normalize_availability`].
#[derive(Debug, Clone)]
pub struct NormalizedAvailability {
    pub departures: Vec<Departure>,
    pub total_rates: usize,
    pub duration_nights: Option<i32>,
}

/// A named price-extraction strategy over a `pricesByRate` entry.
///
/// Returns `(amount, currency)`; a `None` currency defaults to GBP later.
type PriceStrategy = (
    &'static str,
    fn(&RawPriceByRate) -> Option<(Decimal, Option<String>)>,
);

fn category_price(entry: &RawPriceByRate) -> Option<(Decimal, Option<String>)> {
    entry
        .pricing_category_prices
        .iter()
        .find_map(|c| c.amount.map(|a| (a, c.currency.clone())))
}

fn entry_total(entry: &RawPriceByRate) -> Option<(Decimal, Option<String>)> {
    entry
        .total
        .as_ref()
        .and_then(|t| t.amount.map(|a| (a, t.currency.clone())))
}

/// Tried in order; the per-category breakdown beats the entry total.
const PRICE_STRATEGIES: &[PriceStrategy] =
    &[("category-price", category_price), ("entry-total", entry_total)];

fn extract_entry_price(entry: &RawPriceByRate) -> Option<(Decimal, Option<String>)> {
    PRICE_STRATEGIES.iter().find_map(|(_, strategy)| strategy(entry))
}

/// Normalizes a raw availability payload into flat departures.
///
/// Dates that produce zero priced rates are dropped. The flat `rates[].price`
/// fallback is only consulted when no `pricesByRate` entry priced, and a rate
/// whose currency cannot be converted to GBP is silently omitted.
#[must_use]
pub fn normalize_availability(
    raw: &[RawAvailability],
    duration_text: Option<&str>,
    exchange_rates: &ExchangeRates,
) -> NormalizedAvailability {
    let duration_nights = duration_text.and_then(parse_duration_to_nights);

    let mut departures = Vec::new();
    let mut total_rates = 0usize;

    for entry in raw {
        let meta_by_id: HashMap<&str, &RawRate> =
            entry.rates.iter().map(|r| (r.id.as_str(), r)).collect();

        let mut rates: Vec<Rate> = entry
            .prices_by_rate
            .iter()
            .filter_map(|priced| {
                let (amount, currency) = extract_entry_price(priced)?;
                let meta = meta_by_id.get(priced.rate_id.as_str()).copied();
                build_rate(&priced.rate_id, meta, amount, currency, exchange_rates)
            })
            .collect();

        if rates.is_empty() {
            rates = entry
                .rates
                .iter()
                .filter_map(|r| {
                    let price = r.price.as_ref()?;
                    let amount = price.amount?;
                    build_rate(&r.id, Some(r), amount, price.currency.clone(), exchange_rates)
                })
                .collect();
        }

        if rates.is_empty() {
            continue;
        }

        total_rates += rates.len();
        departures.push(Departure {
            date: entry.date,
            start_time: entry.start_time.clone(),
            total_capacity: entry.total_capacity,
            available_capacity: entry.available_capacity,
            sold_out: entry.sold_out,
            rates,
        });
    }

    NormalizedAvailability {
        departures,
        total_rates,
        duration_nights,
    }
}

fn build_rate(
    rate_id: &str,
    meta: Option<&RawRate>,
    amount: Decimal,
    currency: Option<String>,
    exchange_rates: &ExchangeRates,
) -> Option<Rate> {
    let title = meta
        .and_then(|m| m.title.clone())
        .unwrap_or_else(|| format!("Rate {rate_id}"));
    let currency = currency.unwrap_or_else(|| "GBP".to_string());
    let price_gbp = convert_to_gbp(amount, &currency, exchange_rates)?;
    let min_occupancy = meta.and_then(|m| m.min_per_booking);

    Some(Rate {
        supplier_rate_id: rate_id.to_string(),
        room_category: infer_room_category(&title, min_occupancy),
        hotel_category: infer_hotel_category(&title),
        min_occupancy,
        max_occupancy: meta.and_then(|m| m.max_per_booking),
        original_price: amount,
        original_currency: currency,
        price_gbp,
        title,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RawCategoryPrice, RawPrice};
    use chrono::NaiveDate;
    use tripfare_core::RoomCategory;

    fn rates() -> ExchangeRates {
        ExchangeRates::from_env_str("USD=1.25,EUR=1.17")
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().expect("valid date")
    }

    fn raw_rate(id: &str, title: &str, min: Option<i32>, price: Option<i64>) -> RawRate {
        RawRate {
            id: id.to_string(),
            title: Some(title.to_string()),
            min_per_booking: min,
            max_per_booking: None,
            price: price.map(|p| RawPrice {
                amount: Some(Decimal::from(p)),
                currency: Some("GBP".to_string()),
            }),
        }
    }

    fn priced(rate_id: &str, category: Option<i64>, total: Option<i64>) -> RawPriceByRate {
        RawPriceByRate {
            rate_id: rate_id.to_string(),
            pricing_category_prices: category
                .map(|a| {
                    vec![RawCategoryPrice {
                        category: Some("ADULT".to_string()),
                        amount: Some(Decimal::from(a)),
                        currency: Some("GBP".to_string()),
                    }]
                })
                .unwrap_or_default(),
            total: total.map(|a| RawPrice {
                amount: Some(Decimal::from(a)),
                currency: Some("GBP".to_string()),
            }),
        }
    }

    fn availability(
        date_str: &str,
        prices_by_rate: Vec<RawPriceByRate>,
        rate_meta: Vec<RawRate>,
    ) -> RawAvailability {
        RawAvailability {
            date: date(date_str),
            start_time: None,
            total_capacity: Some(20),
            available_capacity: Some(12),
            sold_out: false,
            prices_by_rate,
            rates: rate_meta,
        }
    }

    #[test]
    fn category_price_beats_entry_total() {
        // Strategy order contract: the per-category breakdown wins even when
        // a (different) total is present.
        let entry = priced("r1", Some(450), Some(900));
        let (amount, _) = extract_entry_price(&entry).expect("priced");
        assert_eq!(amount, Decimal::from(450));
    }

    #[test]
    fn entry_total_used_when_no_category_prices() {
        let entry = priced("r1", None, Some(900));
        let (amount, _) = extract_entry_price(&entry).expect("priced");
        assert_eq!(amount, Decimal::from(900));
    }

    #[test]
    fn prices_by_rate_preferred_over_flat_rate_price() {
        let raw = vec![availability(
            "2025-06-01",
            vec![priced("r1", Some(450), None)],
            vec![raw_rate("r1", "Twin share", Some(2), Some(999))],
        )];
        let out = normalize_availability(&raw, Some("8 days"), &rates());
        assert_eq!(out.departures.len(), 1);
        let rate = &out.departures[0].rates[0];
        assert_eq!(rate.price_gbp, Decimal::from(450), "not the 999 fallback");
        assert_eq!(rate.title, "Twin share");
        assert_eq!(rate.room_category, RoomCategory::Twin);
    }

    #[test]
    fn flat_rate_price_used_only_when_nothing_priced() {
        let raw = vec![availability(
            "2025-06-01",
            vec![priced("r1", None, None)],
            vec![raw_rate("r1", "Single Supplement", Some(2), Some(250))],
        )];
        let out = normalize_availability(&raw, None, &rates());
        assert_eq!(out.departures.len(), 1);
        let rate = &out.departures[0].rates[0];
        assert_eq!(rate.price_gbp, Decimal::from(250));
        // Title keyword beats the min-occupancy hint.
        assert_eq!(rate.room_category, RoomCategory::Single);
    }

    #[test]
    fn dates_with_no_priced_rates_are_dropped() {
        let raw = vec![
            availability("2025-06-01", vec![priced("r1", Some(400), None)], vec![]),
            availability("2025-06-08", vec![priced("r1", None, None)], vec![]),
        ];
        let out = normalize_availability(&raw, None, &rates());
        assert_eq!(out.departures.len(), 1);
        assert_eq!(out.departures[0].date, date("2025-06-01"));
        assert_eq!(out.total_rates, 1);
    }

    #[test]
    fn foreign_currency_converts_to_gbp_by_division() {
        let mut entry = priced("r1", Some(500), None);
        entry.pricing_category_prices[0].currency = Some("USD".to_string());
        let raw = vec![availability("2025-06-01", vec![entry], vec![])];
        let out = normalize_availability(&raw, None, &rates());
        let rate = &out.departures[0].rates[0];
        assert_eq!(rate.original_price, Decimal::from(500));
        assert_eq!(rate.original_currency, "USD");
        assert_eq!(rate.price_gbp, Decimal::from(400)); // 500 / 1.25
    }

    #[test]
    fn unconvertible_currency_drops_the_rate_silently() {
        let mut entry = priced("r1", Some(500), None);
        entry.pricing_category_prices[0].currency = Some("JPY".to_string());
        let raw = vec![availability("2025-06-01", vec![entry], vec![])];
        let out = normalize_availability(&raw, None, &rates());
        assert!(out.departures.is_empty());
    }

    #[test]
    fn duration_is_parsed_from_free_text() {
        let raw = vec![availability(
            "2025-06-01",
            vec![priced("r1", Some(400), None)],
            vec![],
        )];
        assert_eq!(
            normalize_availability(&raw, Some("8 days"), &rates()).duration_nights,
            Some(7)
        );
        assert_eq!(
            normalize_availability(&raw, Some("nonsense"), &rates()).duration_nights,
            None
        );
        assert_eq!(
            normalize_availability(&raw, None, &rates()).duration_nights,
            None
        );
    }

    #[test]
    fn missing_metadata_gets_a_placeholder_title() {
        let raw = vec![availability(
            "2025-06-01",
            vec![priced("r9", Some(400), None)],
            vec![],
        )];
        let out = normalize_availability(&raw, None, &rates());
        assert_eq!(out.departures[0].rates[0].title, "Rate r9");
        assert_eq!(
            out.departures[0].rates[0].room_category,
            RoomCategory::Standard
        );
    }
}
