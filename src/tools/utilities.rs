//! Utility tools.
//!
//! Tools: verify_media_accessibility, list_available_timezones,
//! convert_time_between_timezones

use serde_json::json;

use crate::client::UpstreamRequest;
use crate::convert::{count_of, field, field_or, get_string_arg, parse_timestamp};
use crate::schema;
use crate::tools::{echo, payload, Body, Operation, ToolDef};

/// Get all utility operations.
pub fn operations() -> Vec<Operation> {
    vec![
        Operation::upstream(
            ToolDef::new(
                "verify_media_accessibility",
                "Check that a media URL can be fetched by the social networks.",
                schema!(object {
                    required: { "url": string }
                }),
            ),
            |args| {
                let body = Body::new().set("url", get_string_arg(args, "url")?);
                Ok(UpstreamRequest::post("/utils/verify-media", body.build()))
            },
            |args, r| {
                payload(json!({
                    "url": echo(args, "url"),
                    "valid": field_or(&r, "valid", json!(true)),
                    "issues": field_or(&r, "issues", json!([])),
                    "details": r,
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "list_available_timezones",
                "Timezone identifiers accepted by scheduling tools.",
                schema!(object {}),
            ),
            |_| Ok(UpstreamRequest::get("/utils/timezones")),
            |_, r| {
                payload(json!({
                    "total_timezones": count_of(&r, "timezones"),
                    "timezones": field_or(&r, "timezones", json!([])),
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "convert_time_between_timezones",
                "Convert an ISO-8601 time between two IANA timezones.",
                schema!(object {
                    required: { "time": datetime, "from_timezone": string, "to_timezone": string }
                }),
            ),
            |args| {
                let time = get_string_arg(args, "time")?;
                parse_timestamp("time", &time)?;
                let body = Body::new()
                    .set("time", time)
                    .set("fromTimezone", get_string_arg(args, "from_timezone")?)
                    .set("toTimezone", get_string_arg(args, "to_timezone")?);
                Ok(UpstreamRequest::post("/utils/convert-time", body.build()))
            },
            |args, r| {
                payload(json!({
                    "original_time": echo(args, "time"),
                    "from_timezone": echo(args, "from_timezone"),
                    "to_timezone": echo(args, "to_timezone"),
                    "converted_time": field(&r, "convertedTime"),
                    "result": r,
                }))
            },
        ),
    ]
}
