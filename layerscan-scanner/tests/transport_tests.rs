// HTTP-level tests for the unproxied transport against a local mock server.
// The SOCKS path is exercised only against a live proxy, not in CI.

use layerscan_scanner::ScanError;
use layerscan_scanner::transport::{TorTransport, Transport};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn fetch_captures_status_headers_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("server", "nginx/1.24")
                .set_body_raw("<html><title>home</title></html>", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let transport = TorTransport::direct(5).unwrap();
    let response = transport
        .fetch(&format!("{}/", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.server.as_deref(), Some("nginx/1.24"));
    assert_eq!(response.content_type.as_deref(), Some("text/html"));
    assert!(response.body.contains("home"));
}

#[tokio::test]
async fn error_statuses_are_responses_not_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&mock_server)
        .await;

    let transport = TorTransport::direct(5).unwrap();
    let response = transport
        .fetch(&format!("{}/missing", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(response.status, 404);
}

#[tokio::test]
async fn slow_responses_time_out_as_transport_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let transport = TorTransport::direct(1).unwrap();
    let result = transport.fetch(&format!("{}/slow", mock_server.uri())).await;

    match result {
        Err(ScanError::Transport { reason, .. }) => {
            assert!(reason.contains("timed out"), "unexpected reason: {reason}");
        }
        other => panic!("expected a transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_port_is_a_transport_error() {
    // Nothing listens on this port; connect fails fast.
    let transport = TorTransport::direct(2).unwrap();
    let result = transport.fetch("http://127.0.0.1:9/").await;

    assert!(matches!(result, Err(ScanError::Transport { .. })));
}
