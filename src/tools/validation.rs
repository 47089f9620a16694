//! Pre-flight validation tools. The verdict is always upstream's; these only
//! check that the request itself is well formed.
//!
//! Tools: validate_post_before_publishing, validate_media_for_platform,
//! validate_schedule_datetime

use serde_json::json;

use crate::client::UpstreamRequest;
use crate::convert::{field_or, get_object_arg, get_platform_arg, get_string_arg, parse_timestamp};
use crate::schema;
use crate::tools::{echo, echo_platform, payload, Body, Operation, ToolDef};

/// Get all validation operations.
pub fn operations() -> Vec<Operation> {
    vec![
        Operation::upstream(
            ToolDef::new(
                "validate_post_before_publishing",
                "Validate post parameters (post, platforms, mediaUrls, ...) without publishing.",
                schema!(object {
                    required: { "post_data": object }
                }),
            ),
            |args| {
                let data = get_object_arg(args, "post_data")?;
                Ok(UpstreamRequest::post("/validate/post", data.into()))
            },
            |_, r| {
                payload(json!({
                    "valid": field_or(&r, "valid", json!(true)),
                    "issues": field_or(&r, "issues", json!([])),
                    "warnings": field_or(&r, "warnings", json!([])),
                    "result": r,
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "validate_media_for_platform",
                "Check a media file against one platform's format and size rules.",
                schema!(object {
                    required: { "media_url": string, "platform": platform }
                }),
            ),
            |args| {
                let body = Body::new()
                    .set("url", get_string_arg(args, "media_url")?)
                    .set("platform", get_platform_arg(args, "platform")?.as_str());
                Ok(UpstreamRequest::post("/validate/media", body.build()))
            },
            |args, r| {
                payload(json!({
                    "media_url": echo(args, "media_url"),
                    "platform": echo_platform(args),
                    "valid": field_or(&r, "valid", json!(true)),
                    "issues": field_or(&r, "issues", json!([])),
                    "result": r,
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "validate_schedule_datetime",
                "Ask whether a schedule time is acceptable for a platform.",
                schema!(object {
                    required: { "schedule_date": datetime, "platform": platform }
                }),
            ),
            |args| {
                let date = get_string_arg(args, "schedule_date")?;
                parse_timestamp("schedule_date", &date)?;
                let body = Body::new()
                    .set("scheduleDate", date)
                    .set("platform", get_platform_arg(args, "platform")?.as_str());
                Ok(UpstreamRequest::post("/validate/schedule", body.build()))
            },
            |args, r| {
                payload(json!({
                    "schedule_date": echo(args, "schedule_date"),
                    "platform": echo_platform(args),
                    "valid": field_or(&r, "valid", json!(true)),
                    "issues": field_or(&r, "issues", json!([])),
                    "result": r,
                }))
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::Handler;

    #[test]
    fn past_schedule_dates_are_forwarded() {
        let op = operations().remove(2);
        let Handler::Upstream { build, .. } = op.handler else {
            panic!("expected an upstream handler");
        };
        let args = json!({"schedule_date": "2020-01-01T00:00:00Z", "platform": "facebook"});
        let req = build(args.as_object().unwrap()).unwrap();
        assert_eq!(req.path, "/validate/schedule");

        let bad = json!({"schedule_date": "next week", "platform": "facebook"});
        assert!(build(bad.as_object().unwrap()).is_err());
    }
}
