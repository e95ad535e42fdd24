//! Flight search domain types.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

/// One priced fare from the flight API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub date: NaiveDate,
    #[serde(rename = "origin")]
    pub depart_airport: String,
    #[serde(rename = "destination")]
    pub arrive_airport: String,
    /// Per-person price in GBP.
    pub price: Decimal,
}

/// Cheapest per-person price keyed by departure date, then airport code.
///
/// `BTreeMap` keeps iteration in date order regardless of the order offers
/// arrived in, which the concurrent batches do not guarantee.
pub type DateAirportPrices = BTreeMap<NaiveDate, BTreeMap<String, Decimal>>;

/// Which backend a flight price came from; persisted alongside the price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightSource {
    /// Flight-SERP style round-trip search API.
    Serp,
    /// One-way fare API used for open-jaw itineraries.
    Sunshine,
}

impl FlightSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FlightSource::Serp => "serp",
            FlightSource::Sunshine => "sunshine",
        }
    }

    #[must_use]
    pub fn from_str_loose(value: &str) -> Self {
        if value.eq_ignore_ascii_case("sunshine") {
            FlightSource::Sunshine
        } else {
            FlightSource::Serp
        }
    }
}

/// Display name for a UK departure airport code, for customer-facing price
/// rows. Unknown codes fall back to the code itself.
#[must_use]
pub fn airport_display_name(code: &str) -> &str {
    match code {
        "LHR" => "London Heathrow",
        "LGW" => "London Gatwick",
        "STN" => "London Stansted",
        "LTN" => "London Luton",
        "LCY" => "London City",
        "SEN" => "London Southend",
        "MAN" => "Manchester",
        "BHX" => "Birmingham",
        "BRS" => "Bristol",
        "NCL" => "Newcastle",
        "LBA" => "Leeds Bradford",
        "LPL" => "Liverpool",
        "EMA" => "East Midlands",
        "EDI" => "Edinburgh",
        "GLA" => "Glasgow",
        "ABZ" => "Aberdeen",
        "BFS" => "Belfast International",
        "BHD" => "Belfast City",
        "CWL" => "Cardiff",
        "SOU" => "Southampton",
        _ => code,
    }
}

/// Flight topology for a package, selected by admin configuration.
///
/// A sum type rather than a trait object: the open-jaw pairing is a pure
/// function that stays testable away from any network code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlightTopology {
    /// One search per date returning paired outbound/return fares.
    RoundTrip,
    /// Two one-way searches; the return leg departs from `return_airport`,
    /// which may differ from the outbound arrival airport.
    OpenJaw { return_airport: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_airport_codes_get_display_names() {
        assert_eq!(airport_display_name("LGW"), "London Gatwick");
        assert_eq!(airport_display_name("MAN"), "Manchester");
    }

    #[test]
    fn unknown_airport_codes_fall_back_to_the_code() {
        assert_eq!(airport_display_name("XYZ"), "XYZ");
    }
}
