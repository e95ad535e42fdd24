//! Concurrent flight-search fan-out.
//!
//! Dates are searched in fixed-size batches: requests within a batch run
//! concurrently, batches run in submission order with a delay in between.
//! The cheapest-offer reduction keys on (date, airport), which restores
//! determinism over the unordered arrivals within a batch.

use std::time::Duration;

use chrono::{Days, NaiveDate};
use futures::future::join_all;

use crate::client::FlightClient;
use crate::error::FlightError;
use crate::strategy::{pair_open_jaw, reduce_cheapest};
use crate::types::{DateAirportPrices, FlightTopology, Offer};

/// Cap on explicitly listed departure dates per search.
pub const MAX_SPECIFIC_DATES: usize = 50;
/// Cap on dates derived from a contiguous start/end window.
pub const MAX_RANGE_DATES: usize = 30;

/// Parameters for one combined search.
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub depart_airports: Vec<String>,
    pub arrive_airport: String,
    pub nights: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// The normal path: known departure dates from the availability sync.
    /// When absent, a contiguous range is derived from start/end.
    pub specific_dates: Option<Vec<NaiveDate>>,
}

/// Batch sizing for the fan-out.
#[derive(Debug, Clone, Copy)]
pub struct BatchSettings {
    pub batch_size: usize,
    pub inter_batch_delay_ms: u64,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            batch_size: 5,
            inter_batch_delay_ms: 500,
        }
    }
}

/// Which offer field keys the cheapest map for a one-way pass.
#[derive(Debug, Clone, Copy)]
enum KeySide {
    /// Outbound legs: key on the UK departure airport.
    Depart,
    /// Return legs: key on the UK arrival airport.
    Arrive,
}

impl KeySide {
    fn airport(self, offer: &Offer) -> &str {
        match self {
            KeySide::Depart => &offer.depart_airport,
            KeySide::Arrive => &offer.arrive_airport,
        }
    }
}

/// Result of one batched pass over the date list, with enough bookkeeping to
/// tell "upstream returned no offers" apart from "every request failed".
struct PassOutcome {
    prices: DateAirportPrices,
    attempted: usize,
    failed: usize,
    last_error: Option<FlightError>,
}

impl PassOutcome {
    fn new() -> Self {
        Self {
            prices: DateAirportPrices::new(),
            attempted: 0,
            failed: 0,
            last_error: None,
        }
    }

    fn record_failure(&mut self, error: FlightError) {
        self.failed += 1;
        self.last_error = Some(error);
    }

    fn failed_entirely(&self) -> bool {
        self.attempted > 0 && self.failed == self.attempted
    }
}

/// Derives the date list to search, enforcing the external-API cost caps
/// before any network call.
fn candidate_dates(params: &SearchParams) -> Vec<NaiveDate> {
    if let Some(specific) = &params.specific_dates {
        let mut dates = specific.clone();
        dates.sort_unstable();
        dates.dedup();
        dates.truncate(MAX_SPECIFIC_DATES);
        return dates;
    }

    let mut dates = Vec::new();
    let mut current = params.start_date;
    while current <= params.end_date && dates.len() < MAX_RANGE_DATES {
        dates.push(current);
        let Some(next) = current.checked_add_days(Days::new(1)) else {
            break;
        };
        current = next;
    }
    dates
}

/// Runs a full combined-price search for one package.
///
/// Round-trip packages issue one paired search per date. Open-jaw packages
/// issue an outbound pass (UK airports → destination) and a return pass
/// (`return_airport` → UK airports, on `date + nights`), then pair the legs
/// date-by-date; a departure with only one leg priced yields no price.
///
/// Individual date failures are logged and skipped so siblings still price,
/// but when every requested date slice fails the search fails as a whole:
/// a synchronous caller must be able to tell "upstream is down" apart from
/// "no offers exist".
///
/// # Errors
///
/// Returns [`FlightError::InvalidRequest`] when the airport configuration is
/// unusable, or the last underlying error when every date slice failed.
pub async fn search_combined(
    client: &FlightClient,
    topology: &FlightTopology,
    params: &SearchParams,
    batch: &BatchSettings,
) -> Result<DateAirportPrices, FlightError> {
    if params.depart_airports.is_empty() {
        return Err(FlightError::InvalidRequest(
            "departure airport list is empty".to_owned(),
        ));
    }
    if params.arrive_airport.is_empty() {
        return Err(FlightError::InvalidRequest(
            "destination airport is missing".to_owned(),
        ));
    }

    let dates = candidate_dates(params);
    if dates.is_empty() {
        return Ok(DateAirportPrices::new());
    }

    match topology {
        FlightTopology::RoundTrip => {
            let mut pass = run_round_trip(client, params, &dates, batch).await;
            if pass.failed_entirely() {
                if let Some(err) = pass.last_error.take() {
                    return Err(err);
                }
            }
            Ok(pass.prices)
        }
        FlightTopology::OpenJaw { return_airport } => {
            if return_airport.is_empty() {
                return Err(FlightError::InvalidRequest(
                    "open-jaw return airport is missing".to_owned(),
                ));
            }

            let outbound = run_one_way_pass(
                client,
                &params.depart_airports,
                std::slice::from_ref(&params.arrive_airport),
                &dates,
                KeySide::Depart,
                batch,
            )
            .await;

            let return_dates: Vec<NaiveDate> = dates
                .iter()
                .filter_map(|d| {
                    d.checked_add_days(Days::new(u64::try_from(params.nights.max(0)).unwrap_or(0)))
                })
                .collect();
            let mut returns = run_one_way_pass(
                client,
                std::slice::from_ref(return_airport),
                &params.depart_airports,
                &return_dates,
                KeySide::Arrive,
                batch,
            )
            .await;

            let attempted = outbound.attempted + returns.attempted;
            let failed = outbound.failed + returns.failed;
            if attempted > 0 && failed == attempted {
                if let Some(err) = returns.last_error.take().or(outbound.last_error) {
                    return Err(err);
                }
            }

            Ok(pair_open_jaw(&outbound.prices, &returns.prices, params.nights))
        }
    }
}

async fn run_round_trip(
    client: &FlightClient,
    params: &SearchParams,
    dates: &[NaiveDate],
    batch: &BatchSettings,
) -> PassOutcome {
    let nights = u64::try_from(params.nights.max(0)).unwrap_or(0);
    let mut outcome = PassOutcome::new();

    let chunks: Vec<&[NaiveDate]> = dates.chunks(batch.batch_size.max(1)).collect();
    let last = chunks.len().saturating_sub(1);
    for (i, chunk) in chunks.into_iter().enumerate() {
        let requests = chunk.iter().filter_map(|&date| {
            let return_date = date.checked_add_days(Days::new(nights))?;
            Some(async move {
                (
                    date,
                    client
                        .search_round_trip(
                            &params.depart_airports,
                            &params.arrive_airport,
                            date,
                            return_date,
                        )
                        .await,
                )
            })
        });

        for (date, result) in join_all(requests).await {
            outcome.attempted += 1;
            match result {
                Ok(offers) => {
                    for offer in &offers {
                        reduce_cheapest(
                            &mut outcome.prices,
                            date,
                            &offer.depart_airport,
                            offer.price,
                        );
                    }
                }
                Err(e) => {
                    tracing::warn!(date = %date, error = %e, "round-trip search failed for date");
                    outcome.record_failure(e);
                }
            }
        }

        if i < last && batch.inter_batch_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(batch.inter_batch_delay_ms)).await;
        }
    }

    outcome
}

async fn run_one_way_pass(
    client: &FlightClient,
    origins: &[String],
    destinations: &[String],
    dates: &[NaiveDate],
    key_side: KeySide,
    batch: &BatchSettings,
) -> PassOutcome {
    let mut outcome = PassOutcome::new();

    let chunks: Vec<&[NaiveDate]> = dates.chunks(batch.batch_size.max(1)).collect();
    let last = chunks.len().saturating_sub(1);
    for (i, chunk) in chunks.into_iter().enumerate() {
        let requests = chunk.iter().map(|&date| async move {
            (date, client.search_one_way(origins, destinations, date).await)
        });

        for (date, result) in join_all(requests).await {
            outcome.attempted += 1;
            match result {
                Ok(offers) => {
                    for offer in &offers {
                        reduce_cheapest(
                            &mut outcome.prices,
                            date,
                            key_side.airport(offer),
                            offer.price,
                        );
                    }
                }
                Err(e) => {
                    tracing::warn!(date = %date, error = %e, "one-way search failed for date");
                    outcome.record_failure(e);
                }
            }
        }

        if i < last && batch.inter_batch_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(batch.inter_batch_delay_ms)).await;
        }
    }

    outcome
}
