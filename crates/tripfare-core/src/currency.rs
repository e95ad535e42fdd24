//! Currencies and GBP conversion.
//!
//! Stored exchange rates are GBP→foreign (e.g. `USD = 1.28` means one pound
//! buys 1.28 dollars), so converting a foreign amount back to GBP *divides*
//! by the rate. That direction is easy to invert by accident, which is why
//! the conversion is a named, tested function rather than inline arithmetic.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The currencies the catalog cache is maintained for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    Gbp,
    Usd,
    Eur,
}

impl Currency {
    /// All currencies the scheduled catalog refresh covers.
    pub const ALL: [Currency; 3] = [Currency::Gbp, Currency::Usd, Currency::Eur];

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Currency::Gbp => "GBP",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "GBP" => Some(Currency::Gbp),
            "USD" => Some(Currency::Usd),
            "EUR" => Some(Currency::Eur),
            _ => None,
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// GBP→foreign exchange rates keyed by ISO currency code.
#[derive(Debug, Clone)]
pub struct ExchangeRates {
    rates: HashMap<String, Decimal>,
}

impl ExchangeRates {
    #[must_use]
    pub fn new(rates: HashMap<String, Decimal>) -> Self {
        Self { rates }
    }

    /// Parses a `"USD=1.28,EUR=1.17"` style env string.
    ///
    /// Malformed entries are skipped; an empty string yields an empty table.
    #[must_use]
    pub fn from_env_str(raw: &str) -> Self {
        let mut rates = HashMap::new();
        for entry in raw.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            if let Some((code, rate)) = entry.split_once('=') {
                if let Ok(rate) = rate.trim().parse::<Decimal>() {
                    rates.insert(code.trim().to_ascii_uppercase(), rate);
                }
            }
        }
        Self { rates }
    }

    #[must_use]
    pub fn rate_for(&self, currency_code: &str) -> Option<Decimal> {
        self.rates.get(&currency_code.to_ascii_uppercase()).copied()
    }
}

/// Converts `amount` in `currency_code` to GBP, rounded to 2 decimal places.
///
/// GBP amounts pass through unchanged. Returns `None` when no rate is known
/// for the currency or the rate is non-positive — callers treat that as a
/// missing price, not an error.
#[must_use]
pub fn convert_to_gbp(
    amount: Decimal,
    currency_code: &str,
    rates: &ExchangeRates,
) -> Option<Decimal> {
    if currency_code.eq_ignore_ascii_case("GBP") {
        return Some(amount.round_dp(2));
    }
    let rate = rates.rate_for(currency_code)?;
    if rate <= Decimal::ZERO {
        return None;
    }
    Some((amount / rate).round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates() -> ExchangeRates {
        ExchangeRates::from_env_str("USD=1.25,EUR=1.17")
    }

    #[test]
    fn gbp_passes_through() {
        assert_eq!(
            convert_to_gbp(Decimal::from(100), "GBP", &rates()),
            Some(Decimal::from(100))
        );
    }

    #[test]
    fn foreign_amount_divides_by_rate() {
        // 125 USD at GBP→USD 1.25 is 100 GBP. Dividing, not multiplying.
        assert_eq!(
            convert_to_gbp(Decimal::from(125), "USD", &rates()),
            Some(Decimal::from(100))
        );
    }

    #[test]
    fn result_is_rounded_to_two_places() {
        let got = convert_to_gbp(Decimal::from(100), "EUR", &rates()).unwrap();
        assert_eq!(got, Decimal::new(8547, 2)); // 100 / 1.17 = 85.47
    }

    #[test]
    fn unknown_currency_yields_none() {
        assert_eq!(convert_to_gbp(Decimal::from(50), "JPY", &rates()), None);
    }

    #[test]
    fn non_positive_rate_yields_none() {
        let zero = ExchangeRates::from_env_str("USD=0");
        assert_eq!(convert_to_gbp(Decimal::from(50), "USD", &zero), None);
    }

    #[test]
    fn env_string_parsing_skips_malformed_entries() {
        let r = ExchangeRates::from_env_str("USD=1.25,bogus,EUR=");
        assert_eq!(r.rate_for("USD"), Some(Decimal::new(125, 2)));
        assert_eq!(r.rate_for("EUR"), None);
    }

    #[test]
    fn currency_codes_round_trip() {
        for c in Currency::ALL {
            assert_eq!(Currency::from_code(c.code()), Some(c));
        }
        assert_eq!(Currency::from_code("chf"), None);
    }
}
