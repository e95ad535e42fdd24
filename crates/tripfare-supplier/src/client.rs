//! HTTP client for the supplier catalog/availability API.
//!
//! Every request is signed with a timestamped HMAC-SHA256 over
//! `date + access key + method + path`, carried in three headers. Error
//! payloads are sniffed before JSON parsing: the supplier's gateway answers
//! some failures with an XML or HTML body regardless of status code.

use std::time::Duration;

use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::{Client, Url};
use sha2::Sha256;

use tripfare_core::Currency;

use crate::error::SupplierError;
use crate::types::{CatalogSearchResponse, RawAvailability};

type HmacSha256 = Hmac<Sha256>;

const DATE_HEADER: &str = "x-supplier-date";
const ACCESS_KEY_HEADER: &str = "x-supplier-accesskey";
const SIGNATURE_HEADER: &str = "x-supplier-signature";

/// Client for the supplier REST API.
///
/// Use [`SupplierClient::new`] for production or point `base_url` at a mock
/// server in tests.
#[derive(Debug)]
pub struct SupplierClient {
    client: Client,
    base_url: Url,
    api_key: String,
    shared_secret: String,
}

impl SupplierClient {
    /// Creates a new signed client.
    ///
    /// # Errors
    ///
    /// Returns [`SupplierError::MissingCredentials`] when either credential is
    /// empty, [`SupplierError::Upstream`] for an unparseable base URL, or
    /// [`SupplierError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        base_url: &str,
        api_key: &str,
        shared_secret: &str,
        timeout_secs: u64,
    ) -> Result<Self, SupplierError> {
        if api_key.is_empty() || shared_secret.is_empty() {
            return Err(SupplierError::MissingCredentials);
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("tripfare/0.1 (holiday-pricing)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| SupplierError::Upstream(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.to_owned(),
            shared_secret: shared_secret.to_owned(),
        })
    }

    /// Fetches one page of the supplier catalog in `currency`.
    ///
    /// # Errors
    ///
    /// - [`SupplierError::Http`] on network failure.
    /// - [`SupplierError::Upstream`] on an error payload or non-2xx status.
    /// - [`SupplierError::Deserialize`] if the body is not the expected shape.
    pub async fn search_catalog(
        &self,
        page: u32,
        page_size: u32,
        currency: Currency,
    ) -> Result<CatalogSearchResponse, SupplierError> {
        let url = self.build_url(
            "catalog/search",
            &[
                ("page", &page.to_string()),
                ("pageSize", &page_size.to_string()),
                ("currency", currency.code()),
            ],
        );
        let body = self.request_json(&url, "/catalog/search").await?;
        serde_json::from_value(body).map_err(|e| SupplierError::Deserialize {
            context: format!("searchCatalog(page={page}, currency={currency})"),
            source: e,
        })
    }

    /// Fetches raw availability for a product across a date range.
    ///
    /// The whole range succeeds or fails together; the caller never receives
    /// a partial set of dates from a failed fetch.
    ///
    /// # Errors
    ///
    /// - [`SupplierError::Http`] on network failure.
    /// - [`SupplierError::Upstream`] on an error payload or non-2xx status.
    /// - [`SupplierError::Deserialize`] if the body is not the expected shape.
    pub async fn get_availability(
        &self,
        product_id: &str,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
        currency: Currency,
    ) -> Result<Vec<RawAvailability>, SupplierError> {
        let path = format!("catalog/{product_id}/availability");
        let url = self.build_url(
            &path,
            &[
                ("start", &start.to_string()),
                ("end", &end.to_string()),
                ("currency", currency.code()),
            ],
        );
        let body = self.request_json(&url, &format!("/{path}")).await?;
        serde_json::from_value(body).map_err(|e| SupplierError::Deserialize {
            context: format!("getAvailability(product={product_id})"),
            source: e,
        })
    }

    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self
            .base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone());
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends a signed GET request and parses the response body as JSON,
    /// sniffing markup error payloads first.
    async fn request_json(
        &self,
        url: &Url,
        sign_path: &str,
    ) -> Result<serde_json::Value, SupplierError> {
        let date = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let signature = sign(&self.shared_secret, &date, &self.api_key, "GET", sign_path);

        let response = self
            .client
            .get(url.clone())
            .header(DATE_HEADER, &date)
            .header(ACCESS_KEY_HEADER, &self.api_key)
            .header(SIGNATURE_HEADER, signature)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // The gateway answers some failures with XML/HTML instead of JSON,
        // sometimes under a 200 status. Sniff the prefix before parsing.
        if body.trim_start().starts_with('<') {
            return Err(SupplierError::Upstream(extract_markup_message(&body)));
        }
        if !status.is_success() {
            return Err(SupplierError::Upstream(format!(
                "status {status} from {url}"
            )));
        }

        serde_json::from_str(&body).map_err(|e| SupplierError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}

/// HMAC-SHA256 signature over `date + access key + method + path`, hex-encoded.
fn sign(secret: &str, date: &str, api_key: &str, method: &str, path: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(date.as_bytes());
    mac.update(api_key.as_bytes());
    mac.update(method.as_bytes());
    mac.update(path.as_bytes());
    hex_encode(&mac.finalize().into_bytes())
}

fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        use std::fmt::Write;
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// Pulls a human-readable message out of an XML/HTML error payload.
///
/// Prefers the text of a `<message>` or `<error>` element; falls back to the
/// first text node, then to a generic marker.
fn extract_markup_message(body: &str) -> String {
    use quick_xml::events::Event;
    use quick_xml::Reader;

    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut current_tag = String::new();
    let mut first_text: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name_buf = e.name().as_ref().to_vec();
                current_tag = std::str::from_utf8(&name_buf)
                    .unwrap_or("")
                    .to_ascii_lowercase();
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().unwrap_or_default().into_owned();
                if text.is_empty() {
                    continue;
                }
                if current_tag == "message" || current_tag == "error" {
                    return text;
                }
                if first_text.is_none() {
                    first_text = Some(text);
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }

    first_text.unwrap_or_else(|| "supplier returned a non-JSON error payload".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_is_hex_and_deterministic() {
        let a = sign("secret", "2025-06-01 10:00:00", "key", "GET", "/catalog/search");
        let b = sign("secret", "2025-06-01 10:00:00", "key", "GET", "/catalog/search");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64, "HMAC-SHA256 hex should be 64 chars");
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn signature_varies_with_date_and_path() {
        let base = sign("secret", "2025-06-01 10:00:00", "key", "GET", "/a");
        assert_ne!(base, sign("secret", "2025-06-01 10:00:01", "key", "GET", "/a"));
        assert_ne!(base, sign("secret", "2025-06-01 10:00:00", "key", "GET", "/b"));
    }

    #[test]
    fn empty_credentials_are_rejected() {
        let err = SupplierClient::new("https://api.example.com", "", "secret", 60).unwrap_err();
        assert!(matches!(err, SupplierError::MissingCredentials));
    }

    #[test]
    fn extracts_message_element_from_xml_error() {
        let body = r"<?xml version='1.0'?><fault><code>403</code><message>Invalid signature</message></fault>";
        assert_eq!(extract_markup_message(body), "Invalid signature");
    }

    #[test]
    fn falls_back_to_first_text_node() {
        let body = "<html><body><h1>502 Bad Gateway</h1></body></html>";
        assert_eq!(extract_markup_message(body), "502 Bad Gateway");
    }

    #[test]
    fn empty_markup_yields_generic_message() {
        assert_eq!(
            extract_markup_message("<html></html>"),
            "supplier returned a non-JSON error payload"
        );
    }
}
