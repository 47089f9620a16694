//! Webhook tools.
//!
//! Tools: setup_webhook_endpoint, list_webhook_subscriptions,
//! update_webhook_configuration, remove_webhook

use serde_json::json;

use crate::client::UpstreamRequest;
use crate::convert::{
    count_of, field, field_or, get_optional_string, get_optional_string_list, get_string_arg,
    get_string_list,
};
use crate::error::{McpError, Result};
use crate::schema;
use crate::tools::{echo, payload, Args, Body, Operation, ToolDef};

fn webhook_url(args: &Args, name: &str) -> Result<Option<String>> {
    match get_optional_string(args, name)? {
        Some(url) if !url.starts_with("https://") && !url.starts_with("http://") => {
            Err(McpError::invalid(name, "must be an http(s) URL"))
        }
        other => Ok(other),
    }
}

/// Get all webhook operations.
pub fn operations() -> Vec<Operation> {
    vec![
        Operation::upstream(
            ToolDef::new(
                "setup_webhook_endpoint",
                "Subscribe a URL to upstream events (e.g. social, scheduled, messages).",
                schema!(object {
                    required: { "url": string, "events": array_string }
                }),
            ),
            |args| {
                let url = webhook_url(args, "url")?.ok_or_else(|| McpError::MissingArg("url".into()))?;
                let body = Body::new()
                    .set("url", url)
                    .set("events", get_string_list(args, "events")?);
                Ok(UpstreamRequest::post("/webhooks", body.build()))
            },
            |args, r| {
                payload(json!({
                    "webhook_id": field(&r, "id"),
                    "url": echo(args, "url"),
                    "events": echo(args, "events"),
                    "result": r,
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "list_webhook_subscriptions",
                "Configured webhooks.",
                schema!(object {}),
            ),
            |_| Ok(UpstreamRequest::get("/webhooks")),
            |_, r| {
                payload(json!({
                    "total_webhooks": count_of(&r, "webhooks"),
                    "webhooks": field_or(&r, "webhooks", json!([])),
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "update_webhook_configuration",
                "Change a webhook's URL or subscribed events.",
                schema!(object {
                    required: { "webhook_id": string },
                    optional: { "url": string, "events": array_string }
                }),
            ),
            |args| {
                let body = Body::new()
                    .set("id", get_string_arg(args, "webhook_id")?)
                    .set_opt("url", webhook_url(args, "url")?)
                    .set_opt("events", get_optional_string_list(args, "events")?);
                Ok(UpstreamRequest::patch("/webhooks", body.build()))
            },
            |args, r| {
                payload(json!({
                    "webhook_id": echo(args, "webhook_id"),
                    "updated": true,
                    "result": r,
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "remove_webhook",
                "Delete a webhook subscription.",
                schema!(object {
                    required: { "webhook_id": string }
                }),
            ),
            |args| {
                let body = Body::new().set("id", get_string_arg(args, "webhook_id")?);
                Ok(UpstreamRequest::delete("/webhooks").with_body(body.build()))
            },
            |args, r| {
                payload(json!({
                    "webhook_id": echo(args, "webhook_id"),
                    "deleted": true,
                    "result": r,
                }))
            },
        ),
    ]
}
