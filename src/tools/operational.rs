//! Operational tools.
//!
//! Tools: server_health

use serde_json::json;

use crate::health::HealthReport;
use crate::schema;
use crate::tools::{payload, Operation, ToolDef};

/// Get all operational operations.
pub fn operations() -> Vec<Operation> {
    vec![Operation::local(
        ToolDef::new(
            "server_health",
            "Server status, configuration and current rate-limit usage. \
             Not counted against the rate limit.",
            schema!(object {}),
        ),
        |session, _| {
            let report = serde_json::to_value(HealthReport::capture(session))?;
            Ok(payload(json!({ "health": report })))
        },
    )
    .unlimited()]
}
