#![allow(clippy::unwrap_used)]
// Integration tests for `StoreClient` using wiremock.

use std::time::Duration;

use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use phonedeck_api::{Error, ErrorKind, Method, StoreClient, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, StoreClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = StoreClient::new(base_url, &TransportConfig::default()).unwrap();
    (server, client)
}

// ── Mobiles ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_mobiles() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/mobiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "1", "name": "Pixel 9", "brand": "Google" },
            { "id": 2, "name": "Galaxy S24", "brand": "Samsung" },
        ])))
        .mount(&server)
        .await;

    let mobiles: Vec<Value> = client.list_mobiles().await.unwrap();

    assert_eq!(mobiles.len(), 2);
    assert_eq!(mobiles[0]["name"], "Pixel 9");
    assert_eq!(mobiles[1]["id"], 2);
}

#[tokio::test]
async fn test_create_mobile_sends_json() {
    let (server, client) = setup().await;

    let record = json!({ "id": "1700000000000", "name": "Pixel 9", "brand": "Google" });

    Mock::given(method("POST"))
        .and(path("/mobiles"))
        .and(header("content-type", "application/json"))
        .and(body_json(&record))
        .respond_with(ResponseTemplate::new(201).set_body_json(&record))
        .expect(1)
        .mount(&server)
        .await;

    let created: Value = client.create_mobile(&record).await.unwrap();
    assert_eq!(created["id"], "1700000000000");
}

#[tokio::test]
async fn test_update_mobile_puts_to_record_path() {
    let (server, client) = setup().await;

    let record = json!({ "id": "42", "name": "Pixel 9 Pro", "brand": "Google" });

    Mock::given(method("PUT"))
        .and(path("/mobiles/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&record))
        .expect(1)
        .mount(&server)
        .await;

    let updated: Value = client.update_mobile("42", &record).await.unwrap();
    assert_eq!(updated["name"], "Pixel 9 Pro");
}

#[tokio::test]
async fn test_delete_mobile_accepts_empty_body() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/mobiles/42"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_mobile("42").await.unwrap();
}

// ── Wishlist ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_add_wishlist_entry_returns_store_id() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/wishlist"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "w1", "mobileId": "1", "name": "Pixel 9", "brand": "Google"
        })))
        .mount(&server)
        .await;

    let entry: Value = client
        .add_wishlist_entry(&json!({ "mobileId": "1", "name": "Pixel 9", "brand": "Google" }))
        .await
        .unwrap();
    assert_eq!(entry["id"], "w1");
}

#[tokio::test]
async fn test_delete_wishlist_entry() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/wishlist/w1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_wishlist_entry("w1").await.unwrap();
}

// ── Reviews ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_reviews_for_mobile_filters_by_query() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/reviews"))
        .and(query_param("mobileId", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "r1", "mobileId": "1", "rating": 5, "comment": "Great camera" }
        ])))
        .mount(&server)
        .await;

    let reviews: Vec<Value> = client.reviews_for_mobile("1").await.unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["comment"], "Great camera");
}

#[tokio::test]
async fn test_list_reviews() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/reviews"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "r1", "mobileId": "1", "rating": 5, "comment": "Great camera" },
            { "id": "r2", "mobileId": 2, "rating": 3, "comment": "Average battery" },
        ])))
        .mount(&server)
        .await;

    let reviews: Vec<Value> = client.list_reviews().await.unwrap();
    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews[1]["mobileId"], 2);
}

// ── Generic request ─────────────────────────────────────────────────

#[tokio::test]
async fn test_generic_request() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/reviews/r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "r1" })))
        .mount(&server)
        .await;

    let review: Value = client
        .request(Method::GET, "reviews/r1", None::<&()>)
        .await
        .unwrap();
    assert_eq!(review["id"], "r1");
}

#[tokio::test]
async fn test_generic_request_with_query() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/reviews"))
        .and(query_param("mobileId", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "r1", "mobileId": "1" },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let reviews: Vec<Value> = client
        .request(Method::GET, "reviews?mobileId=1", None::<&()>)
        .await
        .unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["mobileId"], "1");
}

// ── Error handling ──────────────────────────────────────────────────

#[tokio::test]
async fn test_server_error_carries_status() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/mobiles/404"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let err = client.delete_mobile("404").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ServerError);
    assert!(err.is_not_found());
    match err {
        Error::Server {
            status,
            status_text,
            body,
        } => {
            assert_eq!(status, 404);
            assert_eq!(status_text, "Not Found");
            assert_eq!(body, "Not Found");
        }
        other => panic!("expected Server error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_invalid_response() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/mobiles"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let result: Result<Vec<Value>, Error> = client.list_mobiles().await;
    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidResponse);
}

#[tokio::test]
async fn test_unreachable_server_is_network_unavailable() {
    // Bind a server to grab a free port, then drop it so nothing listens there.
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };
    let client = StoreClient::new(Url::parse(&uri).unwrap(), &TransportConfig::default()).unwrap();

    let err = client.ping().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NetworkUnavailable);
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_timeout_is_network_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mobiles"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let transport = TransportConfig::default().with_timeout(Duration::from_millis(50));
    let client = StoreClient::new(Url::parse(&server.uri()).unwrap(), &transport).unwrap();

    let err = client.ping().await.unwrap_err();
    assert!(
        matches!(err, Error::NetworkUnavailable { timed_out: true, .. }),
        "expected timeout, got: {err:?}"
    );
}
