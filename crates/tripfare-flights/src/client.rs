//! HTTP client for the external flight-price API.
//!
//! The API fans out across departure airports server-side when given a
//! multi-airport string, so one request covers every configured airport for
//! a date. Round-trip and one-way searches share the same endpoint; a
//! one-way search simply omits `returnDate`.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::{Client, Url};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::FlightError;
use crate::retry::retry_with_backoff;
use crate::types::{FlightSource, Offer};

/// Fixed checked-baggage approximation added to every fare when the backend
/// only prices carry-on baggage.
pub const CARRY_ON_SURCHARGE_GBP: u32 = 100;

/// Construction parameters for [`FlightClient`].
#[derive(Debug, Clone)]
pub struct FlightClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
    /// The backend prices carry-on only; apply [`CARRY_ON_SURCHARGE_GBP`].
    pub carry_on_only: bool,
    pub source: FlightSource,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}

/// Client for the flight-price search API.
pub struct FlightClient {
    client: Client,
    base_url: Url,
    api_key: String,
    carry_on_only: bool,
    source: FlightSource,
    max_retries: u32,
    retry_backoff_base_ms: u64,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    offers: Vec<Offer>,
}

impl FlightClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns [`FlightError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`FlightError::Api`] for an unparseable
    /// base URL.
    pub fn new(config: FlightClientConfig) -> Result<Self, FlightError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("tripfare/0.1 (holiday-pricing)")
            .build()?;

        let normalised = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| {
            FlightError::Api(format!("invalid base URL '{}': {e}", config.base_url))
        })?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
            carry_on_only: config.carry_on_only,
            source: config.source,
            max_retries: config.max_retries,
            retry_backoff_base_ms: config.retry_backoff_base_ms,
        })
    }

    /// Which backend this client's prices are attributed to.
    #[must_use]
    pub fn source(&self) -> FlightSource {
        self.source
    }

    /// Searches round-trip fares for one departure date across all origins.
    ///
    /// # Errors
    ///
    /// Propagates [`FlightError`] from the request or response parsing.
    pub async fn search_round_trip(
        &self,
        origins: &[String],
        destination: &str,
        date: NaiveDate,
        return_date: NaiveDate,
    ) -> Result<Vec<Offer>, FlightError> {
        self.search_leg(origins, &[destination.to_string()], date, Some(return_date))
            .await
    }

    /// Searches one-way fares for one date. Both sides accept multi-airport
    /// lists; the return leg of an open-jaw search passes the UK airports as
    /// destinations.
    ///
    /// # Errors
    ///
    /// Propagates [`FlightError`] from the request or response parsing.
    pub async fn search_one_way(
        &self,
        origins: &[String],
        destinations: &[String],
        date: NaiveDate,
    ) -> Result<Vec<Offer>, FlightError> {
        self.search_leg(origins, destinations, date, None).await
    }

    async fn search_leg(
        &self,
        origins: &[String],
        destinations: &[String],
        date: NaiveDate,
        return_date: Option<NaiveDate>,
    ) -> Result<Vec<Offer>, FlightError> {
        if origins.is_empty() {
            return Err(FlightError::InvalidRequest(
                "departure airport list is empty".to_owned(),
            ));
        }
        if destinations.is_empty() {
            return Err(FlightError::InvalidRequest(
                "destination airport list is empty".to_owned(),
            ));
        }

        let mut url = self
            .base_url
            .join("v1/search")
            .map_err(|e| FlightError::Api(format!("invalid search path: {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("origins", &origins.join(","));
            pairs.append_pair("destinations", &destinations.join(","));
            pairs.append_pair("date", &date.to_string());
            if let Some(ret) = return_date {
                pairs.append_pair("returnDate", &ret.to_string());
            }
        }

        let offers = retry_with_backoff(self.max_retries, self.retry_backoff_base_ms, || {
            self.request_offers(url.clone())
        })
        .await?;

        Ok(self.apply_surcharge(offers))
    }

    async fn request_offers(&self, url: Url) -> Result<Vec<Offer>, FlightError> {
        let response = self
            .client
            .get(url.clone())
            .header("x-api-key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if status.is_server_error() {
            return Err(FlightError::Server {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FlightError::Api(format!("status {status}: {body}")));
        }

        let body = response.text().await?;
        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| FlightError::Deserialize {
                context: url.to_string(),
                source: e,
            })?;
        Ok(parsed.offers)
    }

    fn apply_surcharge(&self, mut offers: Vec<Offer>) -> Vec<Offer> {
        if self.carry_on_only {
            let surcharge = Decimal::from(CARRY_ON_SURCHARGE_GBP);
            for offer in &mut offers {
                offer.price += surcharge;
            }
        }
        offers
    }
}
