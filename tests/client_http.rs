//! AyrshareClient against a local mock HTTP server.

use mockito::Matcher;
use serde_json::json;
use tokio::net::TcpListener;

use ayrshare_mcp::{AyrshareClient, Config, Envelope, McpError, Upstream, UpstreamRequest};

fn config_for(url: &str) -> Config {
    let mut config = Config::with_api_key("mock-key");
    config.base_url = url.to_string();
    config.timeout_secs = 5;
    config
}

#[tokio::test]
async fn sends_bearer_and_profile_key_headers() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/post")
        .match_header("authorization", "Bearer mock-key")
        .match_header("profile-key", "profile-123")
        .match_header("content-type", Matcher::Regex("application/json".into()))
        .match_body(Matcher::Json(json!({"post": "hi", "platforms": ["twitter"]})))
        .with_status(200)
        .with_body(r#"{"status":"success","id":"p1"}"#)
        .create_async()
        .await;

    let mut config = config_for(&server.url());
    config.profile_key = Some("profile-123".to_string());
    let client = AyrshareClient::new(&config).unwrap();

    let response = client
        .call(UpstreamRequest::post(
            "/post",
            json!({"post": "hi", "platforms": ["twitter"]}),
        ))
        .await
        .unwrap();

    assert_eq!(response["id"], "p1");
    mock.assert_async().await;
}

#[tokio::test]
async fn encodes_query_parameters() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/profiles")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("limit".into(), "100".into()),
            Matcher::UrlEncoded("title".into(), "Acme & Co".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"profiles":[]}"#)
        .create_async()
        .await;

    let client = AyrshareClient::new(&config_for(&server.url())).unwrap();
    let response = client
        .call(
            UpstreamRequest::get("/profiles")
                .with_query("limit", "100")
                .with_query("title", "Acme & Co"),
        )
        .await
        .unwrap();

    assert_eq!(response, json!({"profiles": []}));
    mock.assert_async().await;
}

#[tokio::test]
async fn empty_body_decodes_as_empty_object() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("DELETE", "/media/m1")
        .with_status(200)
        .with_body("")
        .create_async()
        .await;

    let client = AyrshareClient::new(&config_for(&server.url())).unwrap();
    let response = client
        .call(UpstreamRequest::delete("/media/m1"))
        .await
        .unwrap();

    assert_eq!(response, json!({}));
}

#[tokio::test]
async fn error_status_uses_upstream_message() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/post")
        .with_status(400)
        .with_body(r#"{"status":"error","message":"Duplicate post"}"#)
        .create_async()
        .await;

    let client = AyrshareClient::new(&config_for(&server.url())).unwrap();
    let err = client
        .call(UpstreamRequest::post("/post", json!({})))
        .await
        .unwrap_err();

    match err {
        McpError::Api {
            status_code,
            message,
            ..
        } => {
            assert_eq!(status_code, 400);
            assert_eq!(message, "Duplicate post");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn unauthorized_is_reported_as_auth_failure() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/user")
        .with_status(401)
        .with_body(r#"{"message":"bad key"}"#)
        .create_async()
        .await;

    let client = AyrshareClient::new(&config_for(&server.url())).unwrap();
    let err = client.call(UpstreamRequest::get("/user")).await.unwrap_err();

    match err {
        McpError::Api {
            status_code,
            message,
            ..
        } => {
            assert_eq!(status_code, 401);
            assert_eq!(message, "Invalid API key or authentication failed");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn invalid_json_is_an_api_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/user")
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let client = AyrshareClient::new(&config_for(&server.url())).unwrap();
    let err = client.call(UpstreamRequest::get("/user")).await.unwrap_err();
    assert!(matches!(err, McpError::Api { status_code: 200, .. }));
}

#[tokio::test]
async fn unreachable_host_is_a_network_error() {
    let client = AyrshareClient::new(&config_for("http://127.0.0.1:1")).unwrap();
    let err = client.call(UpstreamRequest::get("/user")).await.unwrap_err();
    assert!(matches!(err, McpError::Network(_)), "got {:?}", err);
}

#[tokio::test]
async fn silent_server_is_a_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    // Accept and hold connections without ever answering.
    let holder = tokio::spawn(async move {
        let mut open = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            open.push(socket);
        }
    });

    let mut config = config_for(&format!("http://{}", addr));
    config.timeout_secs = 1;
    let client = AyrshareClient::new(&config).unwrap();
    let err = client.call(UpstreamRequest::get("/user")).await.unwrap_err();

    assert!(matches!(err, McpError::Timeout { secs: 1 }), "got {:?}", err);
    let envelope = Envelope::from_error(&err, &[]).to_json();
    assert_eq!(envelope["status"], "error");
    assert_eq!(envelope["error_type"], "timeout");

    holder.abort();
}
