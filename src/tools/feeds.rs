//! Social feed tools.
//!
//! Tools: get_platform_feed, get_all_platform_feeds

use serde_json::json;

use crate::client::UpstreamRequest;
use crate::convert::{count_of, field_or, get_optional_u64, get_platform_arg};
use crate::schema;
use crate::tools::{payload, Operation, ToolDef};

fn limit_query(limit: Option<u64>) -> Option<String> {
    limit.filter(|n| *n > 0).map(|n| n.to_string())
}

/// Get all feed operations.
pub fn operations() -> Vec<Operation> {
    vec![
        Operation::upstream(
            ToolDef::new(
                "get_platform_feed",
                "Recent posts from the account's feed on one platform.",
                schema!(object {
                    required: { "platform": platform },
                    optional: { "limit": integer }
                }),
            ),
            |args| {
                let platform = get_platform_arg(args, "platform")?;
                Ok(UpstreamRequest::get(format!("/feed/{}", platform.as_str()))
                    .with_optional_query("limit", limit_query(get_optional_u64(args, "limit")?)))
            },
            |args, r| {
                let platform = get_platform_arg(args, "platform")
                    .map(|p| json!(p.as_str()))
                    .unwrap_or_default();
                payload(json!({
                    "platform": platform,
                    "total_posts": count_of(&r, "posts"),
                    "posts": field_or(&r, "posts", json!([])),
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "get_all_platform_feeds",
                "Recent posts from every connected platform.",
                schema!(object {
                    optional: { "limit": integer }
                }),
            ),
            |args| {
                Ok(UpstreamRequest::get("/feed")
                    .with_optional_query("limit", limit_query(get_optional_u64(args, "limit")?)))
            },
            |_, r| payload(json!({ "feeds": r })),
        ),
    ]
}
