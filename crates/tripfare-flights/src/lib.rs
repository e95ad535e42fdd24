//! External flight-price API client and search fan-out.
//!
//! One `search_combined` entry point serves both flight topologies: a
//! round-trip search returning paired fares, and an open-jaw pair of one-way
//! searches whose legs are matched date-by-date. Requests run in fixed-size
//! concurrent batches with a delay between batches to respect the upstream
//! rate limit; individual date failures never abort their siblings.

mod client;
mod error;
mod retry;
mod search;
mod strategy;
mod types;

pub use client::{FlightClient, FlightClientConfig, CARRY_ON_SURCHARGE_GBP};
pub use error::FlightError;
pub use search::{
    search_combined, BatchSettings, SearchParams, MAX_RANGE_DATES, MAX_SPECIFIC_DATES,
};
pub use strategy::{pair_open_jaw, reduce_cheapest};
pub use types::{airport_display_name, DateAirportPrices, FlightSource, FlightTopology, Offer};
