use super::*;

fn client() -> UpstreamClient {
    UpstreamClient::new(
        "https://upstream.example.com/api/stores",
        "https://upstream.example.com/api/queue",
        5,
        "qdash-test/0.1",
    )
    .expect("client should build")
}

#[test]
fn store_list_url_carries_all_params() {
    let url = client().store_list_request_url(&StoreListParams::default());
    assert_eq!(
        url.as_str(),
        "https://upstream.example.com/api/stores?latitude=22.3193&longitude=114.1694&numresults=25&region=HK"
    );
}

#[test]
fn queue_url_carries_region_and_store_id() {
    let url = client().queue_request_url(34, "HK");
    assert_eq!(
        url.as_str(),
        "https://upstream.example.com/api/queue?region=HK&storeid=34"
    );
}

#[test]
fn queue_url_encodes_region() {
    let url = client().queue_request_url(7, "H K&x=1");
    assert_eq!(url.query(), Some("region=H+K%26x%3D1&storeid=7"));
}

#[test]
fn endpoint_urls_keep_existing_query() {
    let client = UpstreamClient::new(
        "https://proxy.example.com/?target=stores",
        "https://proxy.example.com/?target=queue",
        5,
        "qdash-test/0.1",
    )
    .expect("client should build");
    let stores = client.store_list_request_url(&StoreListParams::default());
    assert_eq!(
        stores.query(),
        Some("target=stores&latitude=22.3193&longitude=114.1694&numresults=25&region=HK")
    );

    let queue = client.queue_request_url(42, "HK");
    assert_eq!(queue.query(), Some("target=queue&region=HK&storeid=42"));
}

#[test]
fn new_rejects_unparseable_endpoint() {
    let result = UpstreamClient::new("not a url", "https://ok.example.com", 5, "ua");
    assert!(
        matches!(result, Err(UpstreamError::InvalidUrl { .. })),
        "expected InvalidUrl, got: {result:?}"
    );
}

#[test]
fn new_rejects_non_http_scheme() {
    let result = UpstreamClient::new("https://ok.example.com", "ftp://queue.example.com", 5, "ua");
    assert!(matches!(result, Err(UpstreamError::InvalidUrl { .. })));
}
