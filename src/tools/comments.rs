//! Comment tools.
//!
//! Tools: get_post_comments, add_comment_to_post, reply_to_comment,
//! delete_post_comment

use serde_json::json;

use crate::client::UpstreamRequest;
use crate::convert::{
    count_of, field, field_or, get_optional_platforms, get_platform_arg, get_string_arg,
    platform_names,
};
use crate::error::Result;
use crate::schema;
use crate::tools::{echo, echo_platform, echo_platforms, payload, Args, Body, Operation, ToolDef};

fn with_platforms(body: Body, args: &Args) -> Result<Body> {
    Ok(body.set_opt(
        "platforms",
        get_optional_platforms(args, "platforms")?.map(|p| platform_names(&p)),
    ))
}

/// Get all comment operations.
pub fn operations() -> Vec<Operation> {
    vec![
        Operation::upstream(
            ToolDef::new(
                "get_post_comments",
                "Comments on a post, optionally limited to some platforms.",
                schema!(object {
                    required: { "post_id": string },
                    optional: { "platforms": platforms }
                }),
            ),
            |args| {
                let body = with_platforms(Body::new().set("id", get_string_arg(args, "post_id")?), args)?;
                Ok(UpstreamRequest::post("/comments", body.build()))
            },
            |args, r| {
                payload(json!({
                    "post_id": echo(args, "post_id"),
                    "total_comments": count_of(&r, "comments"),
                    "comments": field_or(&r, "comments", json!([])),
                    "platforms": echo_platforms(args, "all"),
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "add_comment_to_post",
                "Add a comment to a post on some or all of its platforms.",
                schema!(object {
                    required: { "post_id": string, "comment_text": string },
                    optional: { "platforms": platforms }
                }),
            ),
            |args| {
                let body = Body::new()
                    .set("id", get_string_arg(args, "post_id")?)
                    .set("comment", get_string_arg(args, "comment_text")?);
                let body = with_platforms(body, args)?;
                Ok(UpstreamRequest::post("/comments/post", body.build()))
            },
            |args, r| {
                payload(json!({
                    "comment_id": field(&r, "id"),
                    "post_id": echo(args, "post_id"),
                    "platforms": echo_platforms(args, "all"),
                    "warnings": field_or(&r, "warnings", json!([])),
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "reply_to_comment",
                "Reply to an existing comment on one platform.",
                schema!(object {
                    required: { "comment_id": string, "reply_text": string, "platform": platform }
                }),
            ),
            |args| {
                let body = Body::new()
                    .set("commentId", get_string_arg(args, "comment_id")?)
                    .set("comment", get_string_arg(args, "reply_text")?)
                    .set("platform", get_platform_arg(args, "platform")?.as_str());
                Ok(UpstreamRequest::post("/comments/reply", body.build()))
            },
            |args, r| {
                payload(json!({
                    "reply_id": field(&r, "id"),
                    "comment_id": echo(args, "comment_id"),
                    "platform": echo_platform(args),
                    "warnings": field_or(&r, "warnings", json!([])),
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "delete_post_comment",
                "Delete a comment. Omitting platforms deletes it everywhere.",
                schema!(object {
                    required: { "comment_id": string },
                    optional: { "platforms": platforms }
                }),
            ),
            |args| {
                let body = with_platforms(Body::new().set("id", get_string_arg(args, "comment_id")?), args)?;
                Ok(UpstreamRequest::delete("/comments").with_body(body.build()))
            },
            |args, r| {
                payload(json!({
                    "comment_id": echo(args, "comment_id"),
                    "deleted_from": echo_platforms(args, "all platforms"),
                    "result": r,
                }))
            },
        ),
    ]
}
