//! Integration tests for `UpstreamClient` against a local `wiremock` server.

use qdash_core::StoreListParams;
use qdash_upstream::{UpstreamClient, UpstreamError};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> UpstreamClient {
    UpstreamClient::new(
        &format!("{}/stores", server.uri()),
        &format!("{}/queue", server.uri()),
        2,
        "qdash-test/0.1",
    )
    .expect("failed to build test UpstreamClient")
}

// ---------------------------------------------------------------------------
// Store list
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_store_list_parses_rows_and_sends_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stores"))
        .and(query_param("numresults", "25"))
        .and(query_param("region", "HK"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 34,
                "name": "香港仔利港商場店",
                "nameEn": "Aberdeen Port Centre Shopping Arcade",
                "storeStatus": "OPEN",
                "waitingGroup": 62
            },
            { "id": 58, "storeStatus": "CLOSED" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let rows = test_client(&server)
        .fetch_store_list(&StoreListParams::default())
        .await
        .expect("store list should parse");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, 34);
    assert_eq!(rows[0].waiting_group, Some(62));
    assert_eq!(rows[1].store_status.as_deref(), Some("CLOSED"));
}

#[tokio::test]
async fn fetch_store_list_returns_empty_vec_for_empty_array() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stores"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let rows = test_client(&server)
        .fetch_store_list(&StoreListParams::default())
        .await
        .expect("empty array is a valid response");
    assert!(rows.is_empty());
}

#[tokio::test]
async fn fetch_store_list_surfaces_non_success_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stores"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let result = test_client(&server)
        .fetch_store_list(&StoreListParams::default())
        .await;

    assert!(
        matches!(result, Err(UpstreamError::UnexpectedStatus { status: 502, .. })),
        "expected UnexpectedStatus(502), got: {result:?}"
    );
}

#[tokio::test]
async fn fetch_store_list_rejects_non_array_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stores"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"stores": []})))
        .mount(&server)
        .await;

    let result = test_client(&server)
        .fetch_store_list(&StoreListParams::default())
        .await;

    assert!(
        matches!(result, Err(UpstreamError::Deserialize { .. })),
        "expected Deserialize, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// Queue
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_store_queue_parses_entry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/queue"))
        .and(query_param("region", "HK"))
        .and(query_param("storeid", "34"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "shopId": 34,
            "storeQueue": ["265", "266"],
            "waitingGroup": 62,
            "storeStatus": "OPEN"
        })))
        .mount(&server)
        .await;

    let entry = test_client(&server)
        .fetch_store_queue(34, "HK")
        .await
        .expect("queue should parse")
        .expect("queue should be present");

    assert_eq!(entry.store_queue, vec!["265".to_string(), "266".to_string()]);
    assert_eq!(entry.waiting_group, Some(62));
}

#[tokio::test]
async fn fetch_store_queue_maps_not_found_to_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/queue"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = test_client(&server).fetch_store_queue(42, "HK").await;
    assert!(
        matches!(result, Ok(None)),
        "expected Ok(None) for 404, got: {result:?}"
    );
}

#[tokio::test]
async fn fetch_store_queue_maps_null_body_to_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/queue"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    let result = test_client(&server).fetch_store_queue(42, "HK").await;
    assert!(matches!(result, Ok(None)), "got: {result:?}");
}

#[tokio::test]
async fn fetch_store_queue_surfaces_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/queue"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = test_client(&server).fetch_store_queue(58, "HK").await;
    assert!(
        matches!(result, Err(UpstreamError::UnexpectedStatus { status: 500, .. })),
        "expected UnexpectedStatus(500), got: {result:?}"
    );
}

#[tokio::test]
async fn fetch_store_queue_rejects_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/queue"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = test_client(&server).fetch_store_queue(58, "HK").await;
    assert!(matches!(result, Err(UpstreamError::Deserialize { .. })));
}

#[tokio::test]
async fn fetch_store_queue_times_out_on_slow_upstream() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/queue"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"shopId": 1, "storeQueue": []}))
                .set_delay(std::time::Duration::from_secs(4)),
        )
        .mount(&server)
        .await;

    let result = test_client(&server).fetch_store_queue(1, "HK").await;
    let err = result.expect_err("slow upstream should time out");
    assert!(err.is_timeout(), "expected timeout, got: {err:?}");
}
