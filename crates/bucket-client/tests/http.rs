//! HTTP gateway tests against a mock store.

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bucket_client::{ClientConfig, GatewayError, HttpGateway, RemoteArrayGateway};
use bucket_model::ArrayId;

fn gateway_for(server: &MockServer) -> HttpGateway {
    let config = ClientConfig::default().with_api_url(format!("{}/api/", server.uri()));
    HttpGateway::new(&config).unwrap()
}

fn record_json(id: u64, data: &[i64], is_sorted: bool) -> serde_json::Value {
    json!({
        "id": id,
        "data": data,
        "is_sorted": is_sorted,
        "creation_date": "2024-05-01T10:00:00Z",
        "update_date": "2024-05-01T10:00:00Z",
    })
}

#[tokio::test]
async fn update_then_sort_sends_expected_requests_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/arrays/7/"))
        .and(body_json(json!({"data": [5, 3, 9], "is_sorted": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(record_json(7, &[5, 3, 9], false)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/sort/"))
        .and(body_json(json!({"id": 7})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": [3, 5, 9], "execution_time": 0.0123})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let id = ArrayId::new(7);
    gateway.update(id, &[5, 3, 9], false).await.unwrap();
    let outcome = gateway.sort(id).await.unwrap();

    assert_eq!(outcome.data, vec![3, 5, 9]);
    assert!((outcome.execution_time - 0.0123).abs() < f64::EPSILON);

    let requests = server.received_requests().await.unwrap();
    let order: Vec<_> = requests
        .iter()
        .map(|r| (r.method.to_string(), r.url.path().to_string()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("PUT".to_string(), "/api/arrays/7/".to_string()),
            ("POST".to_string(), "/api/sort/".to_string()),
        ]
    );
}

#[tokio::test]
async fn create_posts_unsorted_array() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/arrays/"))
        .and(body_json(json!({"data": [4, -1], "is_sorted": false})))
        .respond_with(ResponseTemplate::new(201).set_body_json(record_json(12, &[4, -1], false)))
        .expect(1)
        .mount(&server)
        .await;

    let record = gateway_for(&server).create(&[4, -1]).await.unwrap();

    assert_eq!(record.id, ArrayId::new(12));
    assert_eq!(record.data, vec![4, -1]);
    assert_eq!(record.created_at.as_str(), "2024-05-01T10:00:00Z");
}

#[tokio::test]
async fn missing_array_is_not_found_not_generic_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/arrays/41/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found."})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/arrays/42/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);

    let missing = gateway.read(ArrayId::new(41)).await.unwrap_err();
    assert!(missing.is_not_found());

    let broken = gateway.read(ArrayId::new(42)).await.unwrap_err();
    assert!(!broken.is_not_found());
    assert!(matches!(broken, GatewayError::Status { status: 500, .. }));
}

#[tokio::test]
async fn list_parses_paginated_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/arrays/"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 120,
            "next": null,
            "previous": "http://localhost:8000/api/arrays/?page=2",
            "results": [record_json(101, &[1, 2], true), record_json(102, &[], false)],
        })))
        .mount(&server)
        .await;

    let page = gateway_for(&server).list(3).await.unwrap();

    assert_eq!(page.total_count, Some(120));
    assert_eq!(page.page_number, 3);
    assert_eq!(page.items.len(), 2);
    assert!(page.items[0].is_sorted);
    assert_eq!(page.page_count(), 3);
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/sort/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = gateway_for(&server).sort(ArrayId::new(1)).await.unwrap_err();

    assert!(matches!(err, GatewayError::Decode(_)));
    assert_eq!(err.user_message(), bucket_client::GENERIC_FAILURE_MESSAGE);
}

#[tokio::test]
async fn unreachable_store_is_network_error() {
    // Nothing listens on port 9 on the loopback interface.
    let config = ClientConfig::default()
        .with_api_url("http://127.0.0.1:9/api")
        .with_timeout_secs(2);
    let gateway = HttpGateway::new(&config).unwrap();

    let err = gateway.list(1).await.unwrap_err();

    assert!(matches!(err, GatewayError::Network(_)));
}
