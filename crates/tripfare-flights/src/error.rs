use thiserror::Error;

/// Errors returned by the flight-price API client.
#[derive(Debug, Error)]
pub enum FlightError {
    /// Network or TLS failure, including timeouts.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream 5xx; transient, worth retrying.
    #[error("flight API server error: status {status}")]
    Server { status: u16 },

    /// Application-level rejection (4xx, bad parameters); retrying won't fix it.
    #[error("flight API error: {0}")]
    Api(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The caller's search parameters are unusable (empty airport list,
    /// missing destination). Reported, never retried.
    #[error("invalid flight search request: {0}")]
    InvalidRequest(String),
}
