//! Price combination and "smart rounding".
//!
//! A customer-facing package price is flight price + land-tour price, marked
//! up by a configured percentage and then snapped to an attractive ending
//! (49/69/99) within its current hundred-band. The rounding never moves a
//! price below `floor(price/100)*100 + 49`.

use rust_decimal::Decimal;

/// Intermediate figures from [`combine`], kept so callers can expose the
/// full breakdown (subtotal, marked-up price, final price) to the storefront.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceBreakdown {
    pub subtotal: Decimal,
    pub with_markup: Decimal,
    pub final_price: Decimal,
}

/// Snaps a price up to the nearest 49/69/99 ending within its hundred-band.
///
/// Non-positive inputs return zero. Prices already ending in 49, 69, or 99
/// are unchanged.
#[must_use]
pub fn smart_round(price: Decimal) -> Decimal {
    if price <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let hundred = Decimal::ONE_HUNDRED;
    let base = (price / hundred).floor() * hundred;
    let remainder = price - base;
    if remainder <= Decimal::from(49) {
        base + Decimal::from(49)
    } else if remainder <= Decimal::from(69) {
        base + Decimal::from(69)
    } else {
        base + Decimal::from(99)
    }
}

/// Combines a per-person flight price with a per-person land-tour price,
/// applies `markup_percent`, and smart-rounds the result.
#[must_use]
pub fn combine(
    flight_price: Decimal,
    land_tour_price: Decimal,
    markup_percent: Decimal,
) -> PriceBreakdown {
    let subtotal = flight_price + land_tour_price;
    let with_markup = subtotal * (Decimal::ONE + markup_percent / Decimal::ONE_HUNDRED);
    PriceBreakdown {
        subtotal,
        with_markup,
        final_price: smart_round(with_markup),
    }
}
