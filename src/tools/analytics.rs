//! Analytics tools.
//!
//! Tools: get_post_analytics, get_social_analytics, get_profile_analytics,
//! list_platforms

use serde_json::{json, Map, Value as JsonValue};

use crate::client::UpstreamRequest;
use crate::convert::{get_optional_platforms, get_platforms, get_string_arg, platform_names};
use crate::platform::Platform;
use crate::schema;
use crate::tools::{echo, echo_platforms, payload, Body, Operation, ToolDef};

/// Get all analytics operations.
pub fn operations() -> Vec<Operation> {
    vec![
        Operation::upstream(
            ToolDef::new(
                "get_post_analytics",
                "Engagement analytics (likes, shares, comments, impressions, reach) for one \
                 post. Omitting platforms covers every platform the post went to.",
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
                Ok(UpstreamRequest::post("/analytics/post", body.build()))
            },
            |args, r| {
                payload(json!({
                    "post_id": echo(args, "post_id"),
                    "analytics": r,
                    "platforms": echo_platforms(args, "all"),
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "get_social_analytics",
                "Aggregate network-level analytics across the given platforms.",
                schema!(object {
                    required: { "platforms": platforms }
                }),
            ),
            |args| {
                let body = Body::new().set("platforms", platform_names(&get_platforms(args, "platforms")?));
                Ok(UpstreamRequest::post("/analytics/social", body.build()))
            },
            |args, r| {
                payload(json!({
                    "platforms": echo_platforms(args, "all"),
                    "analytics": r,
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "get_profile_analytics",
                "Account-level analytics: follower counts, growth and demographics.",
                schema!(object {
                    optional: { "platforms": platforms }
                }),
            ),
            |args| {
                let body = Body::new().set_opt(
                    "platforms",
                    get_optional_platforms(args, "platforms")?.map(|p| platform_names(&p)),
                );
                Ok(UpstreamRequest::post("/analytics/profile", body.build()))
            },
            |args, r| {
                payload(json!({
                    "platforms": echo_platforms(args, "all"),
                    "analytics": r,
                }))
            },
        ),
        Operation::local(
            ToolDef::new(
                "list_platforms",
                "Supported platforms with their media, scheduling and length capabilities.",
                schema!(object {}),
            ),
            |_, _| Ok(platform_catalogue()),
        ),
    ]
}

/// `{total_platforms, platforms: {id: capabilities}}`
pub fn platform_catalogue() -> Map<String, JsonValue> {
    let platforms: Map<String, JsonValue> = Platform::ALL
        .iter()
        .map(|p| (p.as_str().to_string(), p.capabilities_json()))
        .collect();
    payload(json!({
        "total_platforms": platforms.len(),
        "platforms": platforms,
    }))
}
