//! Integration tests for `SupplierClient` using wiremock HTTP mocks.

use rust_decimal::Decimal;
use tripfare_core::Currency;
use tripfare_supplier::{fetch_full_catalog, SupplierClient, SupplierError};
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> SupplierClient {
    SupplierClient::new(base_url, "test-key", "test-secret", 30)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn search_catalog_sends_signature_headers_and_parses_items() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "items": [
            {
                "id": "tour-1",
                "title": "Classic Morocco",
                "price": "1299.00",
                "location": "Morocco",
                "duration": "8 days",
                "photos": [{ "url": "https://img.example.com/morocco.jpg" }]
            }
        ],
        "totalHits": 1
    });

    Mock::given(method("GET"))
        .and(path("/catalog/search"))
        .and(query_param("page", "1"))
        .and(query_param("pageSize", "50"))
        .and(query_param("currency", "GBP"))
        .and(header_exists("x-supplier-date"))
        .and(header_exists("x-supplier-accesskey"))
        .and(header_exists("x-supplier-signature"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let page = client
        .search_catalog(1, 50, Currency::Gbp)
        .await
        .expect("should parse catalog page");

    assert_eq!(page.total_hits, 1);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, "tour-1");
    assert_eq!(page.items[0].price, Some(Decimal::new(129_900, 2)));
}

#[tokio::test]
async fn get_availability_parses_nested_rates() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        {
            "date": "2025-06-01",
            "startTime": "08:30",
            "totalCapacity": 24,
            "availableCapacity": 10,
            "soldOut": false,
            "pricesByRate": [
                {
                    "rateId": "r1",
                    "pricingCategoryPrices": [
                        { "category": "ADULT", "amount": "899.00", "currency": "GBP" }
                    ]
                }
            ],
            "rates": [
                { "id": "r1", "title": "Twin share", "minPerBooking": 2, "maxPerBooking": 2 }
            ]
        }
    ]);

    Mock::given(method("GET"))
        .and(path("/catalog/tour-1/availability"))
        .and(query_param("start", "2025-06-01"))
        .and(query_param("end", "2025-09-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let raw = client
        .get_availability(
            "tour-1",
            "2025-06-01".parse().unwrap(),
            "2025-09-01".parse().unwrap(),
            Currency::Gbp,
        )
        .await
        .expect("should parse availability");

    assert_eq!(raw.len(), 1);
    assert_eq!(raw[0].prices_by_rate.len(), 1);
    assert_eq!(raw[0].rates[0].title.as_deref(), Some("Twin share"));
}

#[tokio::test]
async fn xml_error_payload_is_sniffed_and_message_extracted() {
    let server = MockServer::start().await;

    // The supplier gateway answers signature failures with XML under a 200.
    let body = "<?xml version=\"1.0\"?><fault><message>Invalid signature</message></fault>";
    Mock::given(method("GET"))
        .and(path("/catalog/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .search_catalog(1, 50, Currency::Gbp)
        .await
        .unwrap_err();

    match err {
        SupplierError::Upstream(msg) => assert_eq!(msg, "Invalid signature"),
        other => panic!("expected Upstream, got {other:?}"),
    }
}

#[tokio::test]
async fn non_success_status_surfaces_as_upstream_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/catalog/search"))
        .respond_with(ResponseTemplate::new(503).set_body_string("\"busy\""))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .search_catalog(1, 50, Currency::Gbp)
        .await
        .unwrap_err();
    assert!(matches!(err, SupplierError::Upstream(_)));
}

#[tokio::test]
async fn full_catalog_walks_pages_until_total_hits() {
    let server = MockServer::start().await;

    let item = |id: &str| {
        serde_json::json!({
            "id": id,
            "title": format!("Tour {id}"),
            "price": "500.00",
            "photos": []
        })
    };

    Mock::given(method("GET"))
        .and(path("/catalog/search"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [item("a"), item("b")],
            "totalHits": 3
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/catalog/search"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [item("c")],
            "totalHits": 3
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let items = fetch_full_catalog(&client, Currency::Gbp, 2, 0)
        .await
        .expect("should collect both pages");

    assert_eq!(items.len(), 3);
    assert_eq!(items[2].id, "c");
}
