mod harness;

use axum::http::StatusCode;
use harness::config::ConfigBuilder;
use harness::mock_upstream::MockUpstream;
use harness::server::TestServer;
use serde_json::json;

fn chat_body() -> serde_json::Value {
    json!({"model": "gpt-4o", "messages": [{"role": "user", "content": "hi"}]})
}

#[tokio::test]
async fn upstream_error_status_and_body_are_mirrored() {
    let mock = MockUpstream::start_failing(StatusCode::NOT_FOUND, "not found").await.unwrap();
    let server = TestServer::start(ConfigBuilder::new().with_upstream(&mock.base_url()).build())
        .await
        .unwrap();

    let resp = server.post_json("/v1/chat/completions", &chat_body()).await;

    assert_eq!(resp.status(), 404);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(
        json,
        json!({
            "error": {
                "message": "not found",
                "type": "error",
                "status": 404,
                "statusText": "Not Found"
            }
        })
    );
}

#[tokio::test]
async fn upstream_rate_limit_is_mirrored() {
    let mock = MockUpstream::start_failing(StatusCode::TOO_MANY_REQUESTS, r#"{"error":"slow down"}"#)
        .await
        .unwrap();
    let server = TestServer::start(ConfigBuilder::new().with_upstream(&mock.base_url()).build())
        .await
        .unwrap();

    let resp = server.post_json("/v1/chat/completions", &chat_body()).await;

    assert_eq!(resp.status(), 429);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["error"]["message"], r#"{"error":"slow down"}"#);
    assert_eq!(json["error"]["status"], 429);
    assert_eq!(json["error"]["statusText"], "Too Many Requests");
}

#[tokio::test]
async fn unreachable_upstream_is_internal_error() {
    // Bind and drop a listener to get a port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let server = TestServer::start(ConfigBuilder::new().with_upstream(&format!("http://{addr}")).build())
        .await
        .unwrap();

    let resp = server.post_json("/v1/chat/completions", &chat_body()).await;

    assert_eq!(resp.status(), 500);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["error"]["type"], "error");
    assert!(
        json["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("upstream request failed")
    );
    assert!(json["error"].get("status").is_none());
    assert!(json["error"].get("statusText").is_none());
}

#[tokio::test]
async fn malformed_json_is_internal_error() {
    let mock = MockUpstream::start().await.unwrap();
    let server = TestServer::start(ConfigBuilder::new().with_upstream(&mock.base_url()).build())
        .await
        .unwrap();

    let resp = server.post_raw("/v1/chat/completions", "{not json").await;

    assert_eq!(resp.status(), 500);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["error"]["type"], "error");
    assert!(!json["error"]["message"].as_str().unwrap().is_empty());
    assert!(json["error"].get("status").is_none());
    assert!(mock.received().is_empty());
}

#[tokio::test]
async fn missing_messages_is_internal_error() {
    let mock = MockUpstream::start().await.unwrap();
    let server = TestServer::start(ConfigBuilder::new().with_upstream(&mock.base_url()).build())
        .await
        .unwrap();

    let resp = server.post_json("/v1/chat/completions/tokens", &json!({"model": "gpt-4o"})).await;

    assert_eq!(resp.status(), 500);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert!(json["error"]["message"].as_str().unwrap().contains("messages"));
}
