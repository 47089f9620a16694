//! Resource reads against a recording upstream stub.

mod common;

use serde_json::{json, Value as JsonValue};

use ayrshare_mcp::{McpError, ResourceRegistry};

use common::{limited_session, session, StubUpstream};

fn scheduled(id: &str, date: &str, text: &str) -> JsonValue {
    json!({"id": id, "scheduleDate": date, "post": text, "platforms": ["twitter"]})
}

#[tokio::test]
async fn calendar_groups_posts_by_date_regardless_of_order() {
    let posts = vec![
        scheduled("b", "2024-12-24T18:00:00Z", "Christmas eve"),
        scheduled("a", "2024-12-03T09:30:00Z", "Early December"),
        scheduled("c", "2024-12-24T08:15:00Z", "Morning"),
        scheduled("x", "2025-01-02T10:00:00Z", "Next year"),
    ];
    let mut reversed = posts.clone();
    reversed.reverse();

    let registry = ResourceRegistry::new();
    let mut documents = Vec::new();
    for order in [posts, reversed] {
        let upstream = StubUpstream::new().respond("/history/scheduled", json!({ "posts": order }));
        let session = session(upstream);
        let out = registry
            .read(&session, "ayrshare://calendar/2024/12")
            .await
            .unwrap()
            .to_json();
        documents.push(out);
    }

    assert_eq!(documents[0], documents[1]);
    let calendar = &documents[0];
    assert_eq!(calendar["status"], "success");
    assert_eq!(calendar["total_scheduled"], 3);
    let days = calendar["days"].as_array().unwrap();
    assert_eq!(days.len(), 2);
    assert_eq!(days[0]["date"], "2024-12-03");
    assert_eq!(days[1]["date"], "2024-12-24");
    assert_eq!(days[1]["posts"][0]["id"], "c");
    assert_eq!(days[1]["posts"][1]["id"], "b");
}

#[tokio::test]
async fn calendar_rejects_bad_month() {
    let upstream = StubUpstream::new();
    let session = session(upstream.clone());
    let out = ResourceRegistry::new()
        .read(&session, "ayrshare://calendar/2024/13")
        .await
        .unwrap()
        .to_json();

    assert_eq!(out["status"], "error");
    assert_eq!(out["error_type"], "validation");
    assert_eq!(upstream.call_count(), 0);
}

#[tokio::test]
async fn dashboard_fails_as_a_whole() {
    let upstream = StubUpstream::new()
        .respond("/history", json!({"posts": [{"status": "success", "platforms": ["twitter"]}]}))
        .fail("/analytics/profile", 500);
    let session = session(upstream);

    let out = ResourceRegistry::new()
        .read(&session, "ayrshare://analytics/dashboard/weekly")
        .await
        .unwrap()
        .to_json();

    assert_eq!(out["status"], "error");
    assert_eq!(out["error_type"], "api");
    assert!(out.get("total_posts").is_none());
}

#[tokio::test]
async fn dashboard_summarizes_history() {
    let upstream = StubUpstream::new()
        .respond(
            "/history",
            json!({"posts": [
                {"status": "success", "platforms": ["twitter", "linkedin"]},
                {"status": "success", "platforms": ["twitter"]},
                {"status": "error", "platforms": ["facebook"]},
            ]}),
        )
        .respond("/analytics/profile", json!({"followers": 10}));
    let session = session(upstream.clone());

    let out = ResourceRegistry::new()
        .read(&session, "ayrshare://analytics/dashboard/weekly")
        .await
        .unwrap()
        .to_json();

    assert_eq!(out["status"], "success");
    assert_eq!(out["total_posts"], 3);
    assert_eq!(out["platforms_used"], json!(["facebook", "linkedin", "twitter"]));

    let history_call = upstream
        .calls()
        .into_iter()
        .find(|c| c.path == "/history")
        .unwrap();
    assert_eq!(history_call.body.unwrap()["lastDays"], 7);
}

#[tokio::test]
async fn dashboard_rejects_unknown_period() {
    let upstream = StubUpstream::new();
    let session = session(upstream.clone());

    let out = ResourceRegistry::new()
        .read(&session, "ayrshare://analytics/dashboard/yearly")
        .await
        .unwrap()
        .to_json();

    assert_eq!(out["error_type"], "validation");
    assert_eq!(upstream.call_count(), 0);
}

#[tokio::test]
async fn profiles_overview_follows_cursors() {
    let upstream = StubUpstream::new()
        .respond(
            "/profiles",
            json!({"profiles": [{"title": "A", "activeSocialAccounts": ["twitter"]}], "nextCursor": "c1"}),
        )
        .respond(
            "/profiles",
            json!({"profiles": [{"title": "B", "activeSocialAccounts": []}]}),
        );
    let session = session(upstream.clone());

    let out = ResourceRegistry::new()
        .read(&session, "ayrshare://profiles/overview")
        .await
        .unwrap()
        .to_json();

    assert_eq!(out["status"], "success");
    assert_eq!(out["total_profiles"], 2);
    assert_eq!(out["active_profiles"], 1);
    assert_eq!(out["inactive_profiles"], 1);

    let calls = upstream.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[1]
        .query
        .contains(&("cursor".to_string(), "c1".to_string())));
}

#[tokio::test]
async fn profiles_overview_stops_on_repeated_cursor() {
    let upstream = StubUpstream::new()
        .respond("/profiles", json!({"profiles": [], "nextCursor": "c1"}))
        .respond("/profiles", json!({"profiles": [], "nextCursor": "c1"}));
    let session = session(upstream.clone());

    let out = ResourceRegistry::new()
        .read(&session, "ayrshare://profiles/overview")
        .await
        .unwrap()
        .to_json();

    assert_eq!(out["status"], "error");
    assert_eq!(out["error_type"], "api");
    assert_eq!(upstream.call_count(), 2);
}

#[tokio::test]
async fn unknown_uri_is_an_error() {
    let session = session(StubUpstream::new());
    let err = ResourceRegistry::new()
        .read(&session, "ayrshare://nothing/here")
        .await
        .unwrap_err();
    assert!(matches!(err, McpError::UnknownResource(_)));
}

#[tokio::test]
async fn one_read_counts_once_against_the_limit() {
    let upstream = StubUpstream::new();
    let session = limited_session(upstream.clone(), 0, 1);
    let registry = ResourceRegistry::new();

    // Two upstream calls, one admission.
    let out = registry
        .read(&session, "ayrshare://analytics/dashboard/daily")
        .await
        .unwrap()
        .to_json();
    assert_eq!(out["status"], "success");
    assert_eq!(upstream.call_count(), 2);

    let out = registry
        .read(&session, "ayrshare://history")
        .await
        .unwrap()
        .to_json();
    assert_eq!(out["error_type"], "rate_limit");
    assert_eq!(upstream.call_count(), 2);
}
