use super::MockUpstreamClient;
use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use claude_relay::{
    config::{LogVerbosity, ServerConfig, UpstreamConfig},
    credentials::StaticCredential,
    server::{AppState, router},
    upstream::AnthropicClient,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

pub const RELAY_PATH: &str = "/api/claude";
pub const TEST_API_KEY: &str = "sk-ant-test-key";

/// Sample chat request matching what the browser client sends
pub const SAMPLE_CHAT_REQUEST: &str =
    r#"{"model":"x","max_tokens":10,"messages":[{"role":"user","content":"hi"}]}"#;

/// Sample configuration YAML for testing
pub const SAMPLE_CONFIG_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: 3000
  path: "/relay"
  max_body_bytes: 1048576
  logs:
    level: "debug"
    verbosity: "full"

upstream:
  base_url: "http://localhost:4010"
  endpoint: "/v1/messages"
  api_version: "2023-06-01"
  api_key_env: "RELAY_TEST_KEY"
  timeout_secs: 15
"#;

/// Build a relay router around a mock upstream
pub fn create_test_app(upstream: MockUpstreamClient, credentials: StaticCredential) -> Router {
    let state = AppState {
        upstream: Arc::new(upstream),
        credentials: Arc::new(credentials),
        verbosity: LogVerbosity::Summary,
        max_body_bytes: ServerConfig::default().max_body_bytes,
    };
    router(state, RELAY_PATH)
}

/// Build a relay router that talks to a real HTTP upstream at `base_url`
pub fn create_http_app(base_url: &str, timeout_secs: u64) -> Router {
    let config = UpstreamConfig {
        base_url: base_url.to_string(),
        timeout_secs,
        ..UpstreamConfig::default()
    };
    let state = AppState {
        upstream: Arc::new(AnthropicClient::new(&config).unwrap()),
        credentials: Arc::new(StaticCredential::present(TEST_API_KEY)),
        verbosity: LogVerbosity::Summary,
        max_body_bytes: ServerConfig::default().max_body_bytes,
    };
    router(state, RELAY_PATH)
}

pub fn relay_request(method: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(RELAY_PATH)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Send one request through the router and return status, headers and body
pub async fn send(app: Router, request: Request<Body>) -> (Response<()>, Value) {
    let response = app.oneshot(request).await.unwrap();
    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (Response::from_parts(parts, ()), json)
}

pub fn assert_cors_headers<T>(response: &Response<T>) {
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "POST, OPTIONS");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type");
}

pub fn request_id(body: &Value) -> String {
    body["requestId"]
        .as_str()
        .expect("response should carry a requestId")
        .to_string()
}

/// Base URL of a local port nothing is listening on
pub fn closed_port_uri() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}
