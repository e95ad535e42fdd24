//! Free-text tour duration parsing.
//!
//! Suppliers describe tour length as loose text ("8 days", "7 Nights",
//! "1 week"). Nights are the unit everything downstream works in, because
//! flight return dates are `departure + nights`.

use regex::Regex;

/// Parses a supplier duration string into a night count.
///
/// Precedence is fixed and must not be reordered:
/// 1. an explicit `"N nights"` wins,
/// 2. `"N days"` maps to `N - 1` nights,
/// 3. `"N weeks"` maps to `N * 7` nights,
/// 4. anything else is `None`.
#[must_use]
pub fn parse_duration_to_nights(text: &str) -> Option<i32> {
    let nights_re = Regex::new(r"(?i)(\d+)\s*nights?").expect("valid nights regex");
    if let Some(caps) = nights_re.captures(text) {
        return caps[1].parse::<i32>().ok();
    }

    let days_re = Regex::new(r"(?i)(\d+)\s*days?").expect("valid days regex");
    if let Some(caps) = days_re.captures(text) {
        return caps[1].parse::<i32>().ok().map(|d| d - 1);
    }

    let weeks_re = Regex::new(r"(?i)(\d+)\s*weeks?").expect("valid weeks regex");
    if let Some(caps) = weeks_re.captures(text) {
        return caps[1].parse::<i32>().ok().map(|w| w * 7);
    }

    None
}
