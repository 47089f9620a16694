//! Ad tools.
//!
//! Tools: create_ad_from_post, get_ad_analytics, manage_ad_campaign,
//! stop_ad_campaign

use serde_json::json;

use crate::client::UpstreamRequest;
use crate::convert::{
    field, get_f64_arg, get_optional_f64, get_optional_object, get_optional_string, get_string_arg,
    get_u64_arg, require_one_of,
};
use crate::error::{McpError, Result};
use crate::schema;
use crate::tools::{echo, payload, Args, Body, Operation, ToolDef};

fn positive_budget(value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(McpError::invalid("budget", "must be greater than 0"))
    }
}

fn build_create_ad(args: &Args) -> Result<UpstreamRequest> {
    let budget = positive_budget(get_f64_arg(args, "budget")?)?;
    let duration = get_u64_arg(args, "duration")?;
    if duration < 1 {
        return Err(McpError::invalid("duration", "must be at least 1 day"));
    }
    let body = Body::new()
        .set("postId", get_string_arg(args, "post_id")?)
        .set("budget", budget)
        .set("duration", duration)
        .set_opt("targeting", get_optional_object(args, "targeting")?);
    Ok(UpstreamRequest::post("/ads/create", body.build()))
}

fn build_manage_ad(args: &Args) -> Result<UpstreamRequest> {
    let budget = get_optional_f64(args, "budget")?
        .map(positive_budget)
        .transpose()?;
    let status = get_optional_string(args, "status")?
        .map(|s| require_one_of("status", s, &["active", "paused"]))
        .transpose()?;
    let body = Body::new()
        .set("id", get_string_arg(args, "ad_id")?)
        .set_opt("budget", budget)
        .set_opt("status", status);
    Ok(UpstreamRequest::patch("/ads", body.build()))
}

/// Get all ad operations.
pub fn operations() -> Vec<Operation> {
    vec![
        Operation::upstream(
            ToolDef::new(
                "create_ad_from_post",
                "Boost an existing post as a paid ad. budget in dollars (> 0), duration in \
                 days (>= 1).",
                schema!(object {
                    required: { "post_id": string, "budget": number, "duration": integer },
                    optional: { "targeting": object }
                }),
            ),
            build_create_ad,
            |args, r| {
                payload(json!({
                    "ad_id": field(&r, "id"),
                    "post_id": echo(args, "post_id"),
                    "budget": echo(args, "budget"),
                    "duration": echo(args, "duration"),
                    "result": r,
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "get_ad_analytics",
                "Performance metrics for an ad.",
                schema!(object {
                    required: { "ad_id": string }
                }),
            ),
            |args| {
                let body = Body::new().set("id", get_string_arg(args, "ad_id")?);
                Ok(UpstreamRequest::post("/ads/analytics", body.build()))
            },
            |args, r| {
                payload(json!({
                    "ad_id": echo(args, "ad_id"),
                    "analytics": r,
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "manage_ad_campaign",
                "Change an ad's budget or status (active or paused).",
                schema!(object {
                    required: { "ad_id": string },
                    optional: { "budget": number, "status": string }
                }),
            ),
            build_manage_ad,
            |args, r| {
                payload(json!({
                    "ad_id": echo(args, "ad_id"),
                    "updated": true,
                    "new_budget": echo(args, "budget"),
                    "new_status": echo(args, "status"),
                    "result": r,
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "stop_ad_campaign",
                "Stop and delete an ad.",
                schema!(object {
                    required: { "ad_id": string }
                }),
            ),
            |args| {
                let body = Body::new().set("id", get_string_arg(args, "ad_id")?);
                Ok(UpstreamRequest::delete("/ads").with_body(body.build()))
            },
            |args, r| {
                payload(json!({
                    "ad_id": echo(args, "ad_id"),
                    "stopped": true,
                    "result": r,
                }))
            },
        ),
    ]
}
