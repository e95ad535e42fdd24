use thiserror::Error;

/// Errors returned by the supplier API client.
#[derive(Debug, Error)]
pub enum SupplierError {
    /// Network or TLS failure from the underlying HTTP client, including
    /// timeouts and non-2xx statuses.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The supplier answered with an error payload (XML/HTML body or a
    /// non-success status with a message).
    #[error("supplier error: {0}")]
    Upstream(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Client was constructed without the API key or shared secret.
    #[error("supplier credentials are not configured")]
    MissingCredentials,

    /// The catalog paging loop hit the hard page cap.
    #[error("catalog paging for {currency} exceeded {max_pages} pages")]
    PaginationLimit { currency: String, max_pages: usize },
}
