//! Auto-schedule tools.
//!
//! Tools: setup_auto_schedule, get_current_auto_schedule, modify_auto_schedule,
//! remove_auto_schedule

use serde_json::json;

use crate::client::UpstreamRequest;
use crate::convert::get_object_arg;
use crate::error::{McpError, Result};
use crate::schema;
use crate::tools::{payload, Args, Operation, ToolDef};

fn schedule_config(args: &Args) -> Result<serde_json::Value> {
    let config = get_object_arg(args, "schedule_config")?;
    if config.is_empty() {
        return Err(McpError::invalid("schedule_config", "must not be empty"));
    }
    Ok(config.into())
}

/// Get all auto-schedule operations.
pub fn operations() -> Vec<Operation> {
    vec![
        Operation::upstream(
            ToolDef::new(
                "setup_auto_schedule",
                "Configure automatic posting times (times, days, platforms, timezone).",
                schema!(object {
                    required: { "schedule_config": object }
                }),
            ),
            |args| Ok(UpstreamRequest::post("/auto-schedule/set", schedule_config(args)?)),
            |_, r| payload(json!({ "schedule_created": true, "result": r })),
        ),
        Operation::upstream(
            ToolDef::new(
                "get_current_auto_schedule",
                "The current auto-schedule configuration.",
                schema!(object {}),
            ),
            |_| Ok(UpstreamRequest::get("/auto-schedule")),
            |_, r| payload(json!({ "schedule": r })),
        ),
        Operation::upstream(
            ToolDef::new(
                "modify_auto_schedule",
                "Change auto-schedule settings.",
                schema!(object {
                    required: { "schedule_config": object }
                }),
            ),
            |args| Ok(UpstreamRequest::put("/auto-schedule/update", schedule_config(args)?)),
            |_, r| payload(json!({ "schedule_updated": true, "result": r })),
        ),
        Operation::upstream(
            ToolDef::new(
                "remove_auto_schedule",
                "Disable the auto-schedule.",
                schema!(object {}),
            ),
            |_| Ok(UpstreamRequest::delete("/auto-schedule")),
            |_, r| payload(json!({ "schedule_removed": true, "result": r })),
        ),
    ]
}
