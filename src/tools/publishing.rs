//! Publishing tools.
//!
//! Tools: post_to_social, schedule_post, update_post, delete_post, retry_post,
//! copy_post, bulk_post, post_with_auto_hashtags, create_evergreen_post,
//! post_with_first_comment, submit_post_for_approval, approve_post

use chrono::Utc;
use serde_json::{json, Value as JsonValue};

use crate::client::UpstreamRequest;
use crate::convert::{
    field, field_or, get_object_list, get_optional_bool, get_optional_platforms,
    get_optional_string, get_optional_string_list, get_optional_u64, get_platforms,
    get_string_arg, get_u64_arg, parse_platforms, parse_timestamp, platform_names,
    require_future, require_one_of, require_range, string_list,
};
use crate::error::{McpError, Result};
use crate::platform::check_text_length;
use crate::schema;
use crate::tools::{echo, echo_platforms, payload, Args, Body, Operation, Payload, ToolDef};

/// Get all publishing operations.
pub fn operations() -> Vec<Operation> {
    vec![
        Operation::upstream(
            ToolDef::new(
                "post_to_social",
                "Publish a post to one or more social networks immediately. \
                 Supported platforms: facebook, instagram, twitter (or x), linkedin, tiktok, \
                 youtube, pinterest, reddit, snapchat, telegram, threads, bluesky, gmb.",
                schema!(object {
                    required: { "post_text": string, "platforms": platforms },
                    optional: { "media_urls": array_string, "shorten_links": boolean }
                }),
            ),
            |args| Ok(UpstreamRequest::post("/post", post_body(args)?.build())),
            |_, r| post_result(&r),
        ),
        Operation::upstream(
            ToolDef::new(
                "schedule_post",
                "Schedule a post for a future date/time (ISO 8601, e.g. 2025-12-25T10:00:00Z).",
                schema!(object {
                    required: { "post_text": string, "platforms": platforms, "scheduled_date": datetime },
                    optional: { "media_urls": array_string, "shorten_links": boolean }
                }),
            ),
            build_schedule_post,
            |args, r| {
                payload(json!({
                    "post_id": field(&r, "id"),
                    "scheduled_for": echo(args, "scheduled_date"),
                    "platforms": echo_platforms(args, "all"),
                    "post_status": field(&r, "status"),
                    "ref_id": field(&r, "refId"),
                    "warnings": field_or(&r, "warnings", json!([])),
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "update_post",
                "Update the text or platforms of an existing scheduled or published post. \
                 Omitting platforms applies the update to every platform the post exists on.",
                schema!(object {
                    required: { "post_id": string },
                    optional: { "post_text": string, "platforms": platforms }
                }),
            ),
            build_update_post,
            |args, r| {
                payload(json!({
                    "post_id": field_or(&r, "id", echo(args, "post_id")),
                    "post_status": field(&r, "status"),
                    "updated": true,
                    "warnings": field_or(&r, "warnings", json!([])),
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "delete_post",
                "Delete a post. Omitting platforms deletes it from every platform it was \
                 published to.",
                schema!(object {
                    required: { "post_id": string },
                    optional: { "platforms": platforms }
                }),
            ),
            |args| {
                let body = Body::new()
                    .set("id", get_string_arg(args, "post_id")?)
                    .set_opt(
                        "platforms",
                        get_optional_platforms(args, "platforms")?.map(|p| platform_names(&p)),
                    );
                Ok(UpstreamRequest::delete("/post").with_body(body.build()))
            },
            |args, r| {
                payload(json!({
                    "post_id": echo(args, "post_id"),
                    "deleted_from": echo_platforms(args, "all platforms"),
                    "result": r,
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "retry_post",
                "Retry a post that failed to publish. Each call issues a new upstream retry.",
                schema!(object {
                    required: { "post_id": string }
                }),
            ),
            |args| {
                let body = Body::new().set("id", get_string_arg(args, "post_id")?);
                Ok(UpstreamRequest::put("/post", body.build()))
            },
            |args, r| {
                payload(json!({
                    "post_id": field_or(&r, "id", echo(args, "post_id")),
                    "post_status": field(&r, "status"),
                    "retried": true,
                    "errors": field_or(&r, "errors", json!([])),
                    "warnings": field_or(&r, "warnings", json!([])),
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "copy_post",
                "Copy an existing post to other platforms, optionally scheduling the copy.",
                schema!(object {
                    required: { "post_id": string, "platforms": platforms },
                    optional: { "scheduled_date": datetime }
                }),
            ),
            build_copy_post,
            |args, r| {
                payload(json!({
                    "original_post_id": echo(args, "post_id"),
                    "new_post_id": field(&r, "id"),
                    "post_status": field(&r, "status"),
                    "platforms": echo_platforms(args, "all"),
                    "scheduled_for": echo(args, "scheduled_date"),
                    "warnings": field_or(&r, "warnings", json!([])),
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "bulk_post",
                "Create several posts in one call. Each entry needs `post` and `platforms`, \
                 and may carry `mediaUrls` and `scheduleDate`.",
                schema!(object {
                    required: { "posts": array_object }
                }),
            ),
            build_bulk_post,
            |args, r| {
                let total = args
                    .get("posts")
                    .and_then(JsonValue::as_array)
                    .map_or(0, Vec::len);
                payload(json!({ "total_posts": total, "results": r }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "post_with_auto_hashtags",
                "Publish a post and let the upstream service add relevant hashtags \
                 (max_hashtags 1-10, position auto or end).",
                schema!(object {
                    required: { "post_text": string, "platforms": platforms },
                    optional: { "max_hashtags": integer, "position": string, "media_urls": array_string }
                }),
            ),
            build_auto_hashtags,
            |args, r| {
                payload(json!({
                    "post_id": field(&r, "id"),
                    "post_status": field(&r, "status"),
                    "hashtags_generated": true,
                    "max_hashtags": args.get("max_hashtags").cloned().unwrap_or(json!(2)),
                    "warnings": field_or(&r, "warnings", json!([])),
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "create_evergreen_post",
                "Publish a post that reposts automatically: repeat 1-10 times, at least \
                 2 days apart, optionally starting at a future start_date.",
                schema!(object {
                    required: {
                        "post_text": string,
                        "platforms": platforms,
                        "repeat": integer,
                        "days_between": integer
                    },
                    optional: { "start_date": datetime, "media_urls": array_string }
                }),
            ),
            build_evergreen,
            |args, r| {
                payload(json!({
                    "post_id": field(&r, "id"),
                    "post_status": field(&r, "status"),
                    "evergreen": true,
                    "repeat_count": echo(args, "repeat"),
                    "days_between": echo(args, "days_between"),
                    "start_date": echo(args, "start_date"),
                    "warnings": field_or(&r, "warnings", json!([])),
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "post_with_first_comment",
                "Publish a post and add a first comment shortly after \
                 (delay_seconds 20-90, default decided upstream).",
                schema!(object {
                    required: { "post_text": string, "platforms": platforms, "first_comment": string },
                    optional: {
                        "comment_media_urls": array_string,
                        "media_urls": array_string,
                        "delay_seconds": integer
                    }
                }),
            ),
            build_first_comment,
            |args, r| {
                payload(json!({
                    "post_id": field(&r, "id"),
                    "post_status": field(&r, "status"),
                    "first_comment_added": true,
                    "comment_text": echo(args, "first_comment"),
                    "warnings": field_or(&r, "warnings", json!([])),
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "submit_post_for_approval",
                "Create a post that waits for manual approval before it is published.",
                schema!(object {
                    required: { "post_text": string, "platforms": platforms },
                    optional: { "notes": string, "media_urls": array_string, "scheduled_date": datetime }
                }),
            ),
            build_for_approval,
            |args, r| {
                payload(json!({
                    "post_id": field(&r, "id"),
                    "post_status": "awaiting_approval",
                    "platforms": echo_platforms(args, "all"),
                    "notes": echo(args, "notes"),
                    "scheduled_date": echo(args, "scheduled_date"),
                    "warnings": field_or(&r, "warnings", json!([])),
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "approve_post",
                "Approve a post that is awaiting approval. It publishes now or at its \
                 scheduled time.",
                schema!(object {
                    required: { "post_id": string }
                }),
            ),
            |args| {
                let body = Body::new()
                    .set("id", get_string_arg(args, "post_id")?)
                    .set("approved", true);
                Ok(UpstreamRequest::patch("/post", body.build()))
            },
            |args, r| {
                payload(json!({
                    "post_id": field_or(&r, "id", echo(args, "post_id")),
                    "post_status": field(&r, "status"),
                    "approved": true,
                    "warnings": field_or(&r, "warnings", json!([])),
                }))
            },
        ),
    ]
}

// ── Shared ─────────────────────────────────────────────────────────────────

/// Validated `post_text` + `platforms` + media, the core of every `/post` body.
fn post_body(args: &Args) -> Result<Body> {
    let text = get_string_arg(args, "post_text")?;
    let platforms = get_platforms(args, "platforms")?;
    check_text_length(&text, &platforms)?;

    Ok(Body::new()
        .set("post", text)
        .set("platforms", platform_names(&platforms))
        .set(
            "shortenLinks",
            get_optional_bool(args, "shorten_links")?.unwrap_or(true),
        )
        .set_opt("mediaUrls", get_optional_string_list(args, "media_urls")?))
}

fn post_result(r: &JsonValue) -> Payload {
    payload(json!({
        "post_id": field(r, "id"),
        "post_status": field(r, "status"),
        "ref_id": field(r, "refId"),
        "errors": field_or(r, "errors", json!([])),
        "warnings": field_or(r, "warnings", json!([])),
    }))
}

fn future_date(args: &Args, name: &str) -> Result<Option<String>> {
    let now = Utc::now();
    get_optional_string(args, name)?
        .map(|s| require_future(name, &s, now).map(|_| s))
        .transpose()
}

// ── Scheduling ─────────────────────────────────────────────────────────────

fn build_schedule_post(args: &Args) -> Result<UpstreamRequest> {
    let date = get_string_arg(args, "scheduled_date")?;
    require_future("scheduled_date", &date, Utc::now())?;
    let body = post_body(args)?.set("scheduleDate", date);
    Ok(UpstreamRequest::post("/post", body.build()))
}

fn build_copy_post(args: &Args) -> Result<UpstreamRequest> {
    let body = Body::new()
        .set("id", get_string_arg(args, "post_id")?)
        .set("platforms", platform_names(&get_platforms(args, "platforms")?))
        .set_opt("scheduleDate", future_date(args, "scheduled_date")?);
    Ok(UpstreamRequest::post("/post/copy", body.build()))
}

// ── Edits ──────────────────────────────────────────────────────────────────

fn build_update_post(args: &Args) -> Result<UpstreamRequest> {
    let post_id = get_string_arg(args, "post_id")?;
    let text = get_optional_string(args, "post_text")?;
    let platforms = get_optional_platforms(args, "platforms")?;
    if let (Some(text), Some(platforms)) = (&text, &platforms) {
        check_text_length(text, platforms)?;
    }

    let body = Body::new()
        .set("id", post_id)
        .set_opt("post", text)
        .set_opt("platforms", platforms.map(|p| platform_names(&p)));
    Ok(UpstreamRequest::patch("/post", body.build()))
}

fn build_bulk_post(args: &Args) -> Result<UpstreamRequest> {
    let posts = get_object_list(args, "posts")?
        .into_iter()
        .enumerate()
        .map(|(i, post)| normalize_bulk_entry(i, post))
        .collect::<Result<Vec<_>>>()?;
    let body = Body::new().set("posts", posts);
    Ok(UpstreamRequest::put("/post/bulk", body.build()))
}

fn normalize_bulk_entry(index: usize, mut post: JsonValue) -> Result<JsonValue> {
    let name = format!("posts[{}]", index);
    let entry = post
        .as_object_mut()
        .ok_or_else(|| McpError::invalid(&name, "expected an object"))?;

    let text = entry
        .get("post")
        .and_then(JsonValue::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| McpError::MissingArg(format!("{}.post", name)))?;

    let names = entry
        .get("platforms")
        .map(|v| string_list(&name, v))
        .transpose()?
        .unwrap_or_default();
    if names.is_empty() {
        return Err(McpError::MissingArg(format!("{}.platforms", name)));
    }
    let platforms = parse_platforms(names)?;
    check_text_length(&text, &platforms)?;

    if let Some(date) = entry.get("scheduleDate").and_then(JsonValue::as_str) {
        parse_timestamp(&format!("{}.scheduleDate", name), date)?;
    }
    entry.insert("platforms".to_string(), platform_names(&platforms));
    Ok(post)
}

// ── Post features ──────────────────────────────────────────────────────────

fn build_auto_hashtags(args: &Args) -> Result<UpstreamRequest> {
    let max = require_range(
        "max_hashtags",
        get_optional_u64(args, "max_hashtags")?.unwrap_or(2),
        1,
        10,
    )?;
    let position = require_one_of(
        "position",
        get_optional_string(args, "position")?.unwrap_or_else(|| "auto".to_string()),
        &["auto", "end"],
    )?;
    let body = post_body(args)?.set("autoHashtag", json!({ "max": max, "position": position }));
    Ok(UpstreamRequest::post("/post", body.build()))
}

fn build_evergreen(args: &Args) -> Result<UpstreamRequest> {
    let repeat = require_range("repeat", get_u64_arg(args, "repeat")?, 1, 10)?;
    let days = get_u64_arg(args, "days_between")?;
    if days < 2 {
        return Err(McpError::invalid(
            "days_between",
            format!("must be at least 2, got {}", days),
        ));
    }

    let auto_repost = Body::new()
        .set("repeat", repeat)
        .set("days", days)
        .set_opt("startDate", future_date(args, "start_date")?);
    let body = post_body(args)?.set("autoRepost", auto_repost.build());
    Ok(UpstreamRequest::post("/post", body.build()))
}

fn build_first_comment(args: &Args) -> Result<UpstreamRequest> {
    let comment = get_string_arg(args, "first_comment")?;
    let delay = get_optional_u64(args, "delay_seconds")?
        .map(|d| require_range("delay_seconds", d, 20, 90))
        .transpose()?;

    let first_comment = Body::new()
        .set("comment", comment)
        .set_opt("mediaUrls", get_optional_string_list(args, "comment_media_urls")?)
        .set_opt("delay", delay);
    let body = post_body(args)?.set("firstComment", first_comment.build());
    Ok(UpstreamRequest::post("/post", body.build()))
}

fn build_for_approval(args: &Args) -> Result<UpstreamRequest> {
    let body = post_body(args)?
        .set("requiresApproval", true)
        .set_opt("notes", get_optional_string(args, "notes")?)
        .set_opt("scheduleDate", future_date(args, "scheduled_date")?);
    Ok(UpstreamRequest::post("/post", body.build()))
}
