//! Post history tools.
//!
//! Tools: get_post_by_history_id, get_all_scheduled_posts, get_repost_series

use serde_json::json;

use crate::client::UpstreamRequest;
use crate::convert::{count_of, field_or, get_path_segment};
use crate::schema;
use crate::tools::{echo, payload, Operation, ToolDef};

/// Get all history operations.
pub fn operations() -> Vec<Operation> {
    vec![
        Operation::upstream(
            ToolDef::new(
                "get_post_by_history_id",
                "One post from the publishing history.",
                schema!(object {
                    required: { "history_id": string }
                }),
            ),
            |args| {
                let id = get_path_segment(args, "history_id")?;
                Ok(UpstreamRequest::get(format!("/history/{}", id)))
            },
            |_, r| payload(json!({ "post": r })),
        ),
        Operation::upstream(
            ToolDef::new(
                "get_all_scheduled_posts",
                "Every post that is scheduled but not yet published.",
                schema!(object {}),
            ),
            |_| Ok(UpstreamRequest::get("/history/scheduled")),
            |_, r| {
                payload(json!({
                    "total_scheduled": count_of(&r, "posts"),
                    "posts": field_or(&r, "posts", json!([])),
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "get_repost_series",
                "Posts belonging to one auto-repost (evergreen) series.",
                schema!(object {
                    required: { "auto_repost_id": string }
                }),
            ),
            |args| {
                let id = get_path_segment(args, "auto_repost_id")?;
                Ok(UpstreamRequest::get(format!("/history/auto-repost/{}", id)))
            },
            |args, r| {
                payload(json!({
                    "auto_repost_id": echo(args, "auto_repost_id"),
                    "total_posts": count_of(&r, "posts"),
                    "posts": field_or(&r, "posts", json!([])),
                }))
            },
        ),
    ]
}
