//! Link shortening tools.
//!
//! Tools: shorten_url, get_link_analytics

use serde_json::json;

use crate::client::UpstreamRequest;
use crate::convert::{field, get_optional_string, get_string_arg};
use crate::schema;
use crate::tools::{echo, payload, Body, Operation, ToolDef};

/// Get all link operations.
pub fn operations() -> Vec<Operation> {
    vec![
        Operation::upstream(
            ToolDef::new(
                "shorten_url",
                "Create a tracked short link, optionally with a custom slug.",
                schema!(object {
                    required: { "url": string },
                    optional: { "custom_slug": string }
                }),
            ),
            |args| {
                let body = Body::new()
                    .set("url", get_string_arg(args, "url")?)
                    .set_opt("customSlug", get_optional_string(args, "custom_slug")?);
                Ok(UpstreamRequest::post("/links/shorten", body.build()))
            },
            |args, r| {
                payload(json!({
                    "original_url": echo(args, "url"),
                    "shortened_url": field(&r, "shortUrl"),
                    "link_id": field(&r, "id"),
                    "custom_slug": echo(args, "custom_slug"),
                    "result": r,
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "get_link_analytics",
                "Click analytics for a short link.",
                schema!(object {
                    required: { "link_id": string }
                }),
            ),
            |args| {
                let body = Body::new().set("id", get_string_arg(args, "link_id")?);
                Ok(UpstreamRequest::post("/links/analytics", body.build()))
            },
            |args, r| {
                payload(json!({
                    "link_id": echo(args, "link_id"),
                    "analytics": r,
                }))
            },
        ),
    ]
}
