//! Tool dispatch through the registry against a recording upstream stub.

mod common;

use chrono::{Duration, Utc};
use serde_json::json;

use ayrshare_mcp::client::HttpMethod;
use ayrshare_mcp::ToolRegistry;

use common::{args, limited_session, session, StubUpstream};

// ============================================================================
// Validation happens before the network
// ============================================================================

#[tokio::test]
async fn missing_required_argument_makes_no_upstream_call() {
    let upstream = StubUpstream::new();
    let session = session(upstream.clone());
    let registry = ToolRegistry::new();

    let out = registry
        .dispatch(&session, "post_to_social", args(json!({"platforms": ["twitter"]})))
        .await
        .unwrap();

    assert_eq!(out["status"], "error");
    assert_eq!(out["error_type"], "validation");
    assert!(out["message"].as_str().unwrap().contains("post_text"));
    assert_eq!(upstream.call_count(), 0);
}

#[tokio::test]
async fn every_tool_validates_required_arguments_locally() {
    let registry = ToolRegistry::new();
    let mut checked = 0;

    for tool in registry.tools() {
        let required = tool.input_schema["required"].as_array().cloned().unwrap_or_default();
        if required.is_empty() {
            continue;
        }

        let upstream = StubUpstream::new();
        let session = session(upstream.clone());
        let out = registry
            .dispatch(&session, &tool.name, args(json!({})))
            .await
            .unwrap();

        assert_eq!(out["status"], "error", "{}", tool.name);
        assert_eq!(out["error_type"], "validation", "{}", tool.name);
        assert_eq!(upstream.call_count(), 0, "{} reached upstream", tool.name);
        checked += 1;
    }

    assert!(checked > 50, "only {} tools have required arguments", checked);
}

#[tokio::test]
async fn unknown_platform_is_rejected() {
    let upstream = StubUpstream::new();
    let session = session(upstream.clone());
    let registry = ToolRegistry::new();

    let out = registry
        .dispatch(
            &session,
            "post_to_social",
            args(json!({"post_text": "hello", "platforms": ["myspace"]})),
        )
        .await
        .unwrap();

    assert_eq!(out["status"], "error");
    assert_eq!(out["error_type"], "validation");
    assert!(out["message"].as_str().unwrap().contains("myspace"));
    assert_eq!(upstream.call_count(), 0);
}

#[tokio::test]
async fn schedule_post_rejects_past_and_accepts_future() {
    let upstream = StubUpstream::new().respond("/post", json!({"id": "s1", "status": "scheduled"}));
    let session = session(upstream.clone());
    let registry = ToolRegistry::new();

    let past = (Utc::now() - Duration::seconds(1)).to_rfc3339();
    let out = registry
        .dispatch(
            &session,
            "schedule_post",
            args(json!({"post_text": "hi", "platforms": ["twitter"], "scheduled_date": past})),
        )
        .await
        .unwrap();
    assert_eq!(out["status"], "error");
    assert_eq!(out["error_type"], "validation");
    assert_eq!(upstream.call_count(), 0);

    let future = (Utc::now() + Duration::hours(1)).to_rfc3339();
    let out = registry
        .dispatch(
            &session,
            "schedule_post",
            args(json!({"post_text": "hi", "platforms": ["twitter"], "scheduled_date": future.clone()})),
        )
        .await
        .unwrap();
    assert_eq!(out["status"], "success");
    assert_eq!(out["post_id"], "s1");
    assert_eq!(out["scheduled_for"], future);
    assert_eq!(upstream.last_call().body.unwrap()["scheduleDate"], future);
}

// ============================================================================
// Successful calls
// ============================================================================

#[tokio::test]
async fn post_to_social_maps_response() {
    let upstream = StubUpstream::new().respond(
        "/post",
        json!({"status": "success", "id": "p1", "refId": "r1", "postIds": []}),
    );
    let session = session(upstream.clone());
    let registry = ToolRegistry::new();

    let out = registry
        .dispatch(
            &session,
            "post_to_social",
            args(json!({"post_text": "Launch day", "platforms": ["X", "linkedin"]})),
        )
        .await
        .unwrap();

    assert_eq!(out["status"], "success");
    assert_eq!(out["post_id"], "p1");
    assert_eq!(out["ref_id"], "r1");

    let call = upstream.last_call();
    assert_eq!(call.method, HttpMethod::Post);
    assert_eq!(call.path, "/post");
    let body = call.body.unwrap();
    assert_eq!(body["post"], "Launch day");
    assert_eq!(body["platforms"], json!(["twitter", "linkedin"]));
    assert_eq!(body["shortenLinks"], true);
}

#[tokio::test]
async fn upstream_failure_becomes_api_envelope() {
    let upstream = StubUpstream::new().fail("/post", 400);
    let session = session(upstream.clone());
    let registry = ToolRegistry::new();

    let out = registry
        .dispatch(
            &session,
            "post_to_social",
            args(json!({"post_text": "hello", "platforms": ["facebook"]})),
        )
        .await
        .unwrap();

    assert_eq!(out["status"], "error");
    assert_eq!(out["error_type"], "api");
    assert_eq!(upstream.call_count(), 1);
}

#[tokio::test]
async fn repeated_calls_keep_their_shape() {
    let upstream = StubUpstream::new().respond("/user/limits", json!({"monthlyPostLimit": 100}));
    let session = session(upstream.clone());
    let registry = ToolRegistry::new();

    let first = registry
        .dispatch(&session, "list_platforms", args(json!({})))
        .await
        .unwrap();
    let second = registry
        .dispatch(&session, "list_platforms", args(json!({})))
        .await
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(first["total_platforms"], 13);

    let first = registry
        .dispatch(&session, "get_api_usage_limits", args(json!({})))
        .await
        .unwrap();
    let second = registry
        .dispatch(&session, "get_api_usage_limits", args(json!({})))
        .await
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(first["limits"]["monthlyPostLimit"], 100);
}

#[tokio::test]
async fn unknown_tool_is_an_error() {
    let upstream = StubUpstream::new();
    let session = session(upstream);
    let registry = ToolRegistry::new();

    assert!(registry
        .call(&session, "no_such_tool", args(json!({})))
        .await
        .is_err());
}

// ============================================================================
// Rate limiting
// ============================================================================

#[tokio::test]
async fn third_call_over_limit_is_rejected() {
    let upstream = StubUpstream::new();
    // Hourly threshold only, so a minute rollover mid-test cannot reset it.
    let session = limited_session(upstream.clone(), 0, 2);
    let registry = ToolRegistry::new();

    let mut types = Vec::new();
    for _ in 0..3 {
        let out = registry
            .dispatch(&session, "get_all_scheduled_posts", args(json!({})))
            .await
            .unwrap();
        types.push(out["status"].as_str().unwrap().to_string());
        if out["status"] == "error" {
            assert_eq!(out["error_type"], "rate_limit");
        }
    }

    assert_eq!(types, vec!["success", "success", "error"]);
    assert_eq!(upstream.call_count(), 2);
}

#[tokio::test]
async fn rejected_arguments_still_count_against_the_limit() {
    let upstream = StubUpstream::new();
    let session = limited_session(upstream.clone(), 0, 1);
    let registry = ToolRegistry::new();

    let out = registry
        .dispatch(&session, "get_post_by_history_id", args(json!({})))
        .await
        .unwrap();
    assert_eq!(out["error_type"], "validation");

    let out = registry
        .dispatch(&session, "get_post_by_history_id", args(json!({"history_id": "h1"})))
        .await
        .unwrap();
    assert_eq!(out["error_type"], "rate_limit");
    assert_eq!(upstream.call_count(), 0);
}

#[tokio::test]
async fn server_health_is_never_limited() {
    let upstream = StubUpstream::new();
    let session = limited_session(upstream.clone(), 0, 1);
    let registry = ToolRegistry::new();

    let out = registry
        .dispatch(&session, "get_all_scheduled_posts", args(json!({})))
        .await
        .unwrap();
    assert_eq!(out["status"], "success");

    for _ in 0..3 {
        let out = registry
            .dispatch(&session, "server_health", args(json!({})))
            .await
            .unwrap();
        assert_eq!(out["status"], "success");
        assert_eq!(out["health"]["status"], "healthy");
        assert_eq!(out["health"]["rate_limits"]["current_hour"], 1);
    }
    assert_eq!(upstream.call_count(), 1);
}
