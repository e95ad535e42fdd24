//! Normalized tour departure and rate types.
//!
//! The supplier's nested availability payload is flattened (by the supplier
//! crate) into these records before anything is persisted or priced.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One bookable calendar date for a package, unique per (package, date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Departure {
    pub date: NaiveDate,
    pub start_time: Option<String>,
    pub total_capacity: Option<i32>,
    pub available_capacity: Option<i32>,
    pub sold_out: bool,
    /// A departure is only emitted when at least one rate priced.
    pub rates: Vec<Rate>,
}

/// A price tier (occupancy/hotel class) under a departure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    pub supplier_rate_id: String,
    pub title: String,
    pub room_category: RoomCategory,
    pub hotel_category: Option<String>,
    pub min_occupancy: Option<i32>,
    pub max_occupancy: Option<i32>,
    pub original_price: Decimal,
    pub original_currency: String,
    pub price_gbp: Decimal,
}

/// Occupancy classification derived from a rate title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomCategory {
    Twin,
    Single,
    Triple,
    Standard,
}

impl RoomCategory {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RoomCategory::Twin => "twin",
            RoomCategory::Single => "single",
            RoomCategory::Triple => "triple",
            RoomCategory::Standard => "standard",
        }
    }

    #[must_use]
    pub fn from_str_loose(value: &str) -> Self {
        match value {
            "twin" => RoomCategory::Twin,
            "single" => RoomCategory::Single,
            "triple" => RoomCategory::Triple,
            _ => RoomCategory::Standard,
        }
    }
}

/// Infers the room category for a rate.
///
/// Precedence is a contract: an explicit keyword in the title always beats
/// the occupancy-count inference, which beats the `Standard` fallback.
/// "Single Supplement" with a min occupancy of 2 still classifies as single.
#[must_use]
pub fn infer_room_category(title: &str, min_occupancy: Option<i32>) -> RoomCategory {
    let lower = title.to_lowercase();
    if lower.contains("twin") || lower.contains("double") {
        return RoomCategory::Twin;
    }
    if lower.contains("single") || lower.contains("solo") {
        return RoomCategory::Single;
    }
    if lower.contains("triple") {
        return RoomCategory::Triple;
    }
    match min_occupancy {
        Some(1) => RoomCategory::Single,
        Some(2) => RoomCategory::Twin,
        Some(3) => RoomCategory::Triple,
        _ => RoomCategory::Standard,
    }
}

/// Extracts a hotel tier label ("3 star", "deluxe", ...) from a rate title,
/// or `None` when the title carries no tier hint.
#[must_use]
pub fn infer_hotel_category(title: &str) -> Option<String> {
    let lower = title.to_lowercase();
    for stars in ["5 star", "4 star", "3 star", "2 star"] {
        if lower.contains(stars) || lower.contains(&stars.replace(' ', "-")) {
            return Some(stars.to_string());
        }
    }
    for tier in ["deluxe", "superior", "premium", "luxury", "comfort", "budget"] {
        if lower.contains(tier) {
            return Some(tier.to_string());
        }
    }
    None
}
