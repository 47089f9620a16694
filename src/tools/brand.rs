//! Brand profile tools.
//!
//! Tools: create_brand_profile_config, get_brand_profile_assets,
//! update_brand_profile_settings

use serde_json::json;

use crate::client::UpstreamRequest;
use crate::convert::get_object_arg;
use crate::schema;
use crate::tools::{payload, Operation, ToolDef};

/// Get all brand operations.
pub fn operations() -> Vec<Operation> {
    vec![
        Operation::upstream(
            ToolDef::new(
                "create_brand_profile_config",
                "Create a brand profile (name, logo, colors, fonts, templates).",
                schema!(object {
                    required: { "brand_data": object }
                }),
            ),
            |args| {
                let data = get_object_arg(args, "brand_data")?;
                Ok(UpstreamRequest::post("/brand/create", data.into()))
            },
            |_, r| payload(json!({ "brand_created": true, "result": r })),
        ),
        Operation::upstream(
            ToolDef::new(
                "get_brand_profile_assets",
                "Brand assets and templates.",
                schema!(object {}),
            ),
            |_| Ok(UpstreamRequest::get("/brand")),
            |_, r| payload(json!({ "brand": r })),
        ),
        Operation::upstream(
            ToolDef::new(
                "update_brand_profile_settings",
                "Update brand profile settings.",
                schema!(object {
                    required: { "brand_data": object }
                }),
            ),
            |args| {
                let data = get_object_arg(args, "brand_data")?;
                Ok(UpstreamRequest::put("/brand/update", data.into()))
            },
            |_, r| payload(json!({ "brand_updated": true, "result": r })),
        ),
    ]
}
