//! Account tools.
//!
//! Tools: get_account_information, update_account_settings, get_api_usage_limits

use serde_json::json;

use crate::client::UpstreamRequest;
use crate::convert::get_object_arg;
use crate::error::McpError;
use crate::schema;
use crate::tools::{payload, Operation, ToolDef};

/// Get all account operations.
pub fn operations() -> Vec<Operation> {
    vec![
        Operation::upstream(
            ToolDef::new(
                "get_account_information",
                "Account details: plan, connected platforms, usage.",
                schema!(object {}),
            ),
            |_| Ok(UpstreamRequest::get("/user")),
            |_, r| payload(json!({ "account": r })),
        ),
        Operation::upstream(
            ToolDef::new(
                "update_account_settings",
                "Update account preferences (notifications, timezone, ...).",
                schema!(object {
                    required: { "settings": object }
                }),
            ),
            |args| {
                let settings = get_object_arg(args, "settings")?;
                if settings.is_empty() {
                    return Err(McpError::invalid("settings", "must contain at least one field"));
                }
                Ok(UpstreamRequest::put("/user/update", settings.into()))
            },
            |_, r| payload(json!({ "settings_updated": true, "result": r })),
        ),
        Operation::upstream(
            ToolDef::new(
                "get_api_usage_limits",
                "API quota and current usage.",
                schema!(object {}),
            ),
            |_| Ok(UpstreamRequest::get("/user/limits")),
            |_, r| payload(json!({ "limits": r })),
        ),
    ]
}
