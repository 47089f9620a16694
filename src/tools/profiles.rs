//! User profile (sub-account) tools.
//!
//! Tools: create_user_profile, list_user_profiles, get_user_profile_details,
//! update_user_profile, delete_user_profile

use serde_json::json;

use crate::client::UpstreamRequest;
use crate::convert::{
    count_of, field, field_or, get_object_arg, get_optional_bool, get_optional_platforms,
    get_optional_string, get_optional_string_list, get_optional_u64, get_path_segment,
    get_string_arg, platform_names,
};
use crate::error::{McpError, Result};
use crate::schema;
use crate::tools::{echo, payload, Args, Body, Operation, ToolDef};

fn build_create_profile(args: &Args) -> Result<UpstreamRequest> {
    let disable_social = get_optional_platforms(args, "disable_social")?;
    let body = Body::new()
        .set("title", get_string_arg(args, "title")?)
        .set_opt("messagingActive", get_optional_bool(args, "messaging_active")?)
        .set_opt("team", get_optional_string_list(args, "team")?)
        .set_opt("email", get_optional_string(args, "email")?)
        .set_opt("disableSocial", disable_social.map(|p| platform_names(&p)))
        .set_opt("tags", get_optional_string_list(args, "tags")?);
    Ok(UpstreamRequest::post("/profiles/profile", body.build()))
}

fn build_list_profiles(args: &Args) -> Result<UpstreamRequest> {
    let includes = get_optional_platforms(args, "includes_active_social")?.map(|platforms| {
        platforms
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(",")
    });
    Ok(UpstreamRequest::get("/profiles")
        .with_optional_query("title", get_optional_string(args, "title")?)
        .with_optional_query("refId", get_optional_string(args, "ref_id")?)
        .with_optional_query(
            "hasActiveSocial",
            get_optional_bool(args, "has_active_social")?.map(|b| b.to_string()),
        )
        .with_optional_query("includesActiveSocial", includes)
        .with_optional_query("limit", get_optional_u64(args, "limit")?.map(|n| n.to_string()))
        .with_optional_query("cursor", get_optional_string(args, "cursor")?))
}

fn build_update_profile(args: &Args) -> Result<UpstreamRequest> {
    let key = get_path_segment(args, "profile_key")?;
    let settings = get_object_arg(args, "settings")?;
    if settings.is_empty() {
        return Err(McpError::invalid("settings", "must contain at least one field"));
    }
    Ok(UpstreamRequest::patch(format!("/profiles/{}", key), settings.into()))
}

/// Get all profile operations.
pub fn operations() -> Vec<Operation> {
    vec![
        Operation::upstream(
            ToolDef::new(
                "create_user_profile",
                "Create a user profile (sub-account). Returns its profile key.",
                schema!(object {
                    required: { "title": string },
                    optional: {
                        "messaging_active": boolean,
                        "team": array_string,
                        "email": string,
                        "disable_social": platforms,
                        "tags": array_string
                    }
                }),
            ),
            build_create_profile,
            |args, r| {
                payload(json!({
                    "profile_key": field(&r, "profileKey"),
                    "title": echo(args, "title"),
                    "result": r,
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "list_user_profiles",
                "List user profiles, filtered by title, reference id or active networks. \
                 Pass the returned cursor to fetch the next page.",
                schema!(object {
                    optional: {
                        "title": string,
                        "ref_id": string,
                        "has_active_social": boolean,
                        "includes_active_social": platforms,
                        "limit": integer,
                        "cursor": string
                    }
                }),
            ),
            build_list_profiles,
            |_, r| {
                payload(json!({
                    "total_profiles": count_of(&r, "profiles"),
                    "profiles": field_or(&r, "profiles", json!([])),
                    "next_cursor": field(&r, "nextCursor"),
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "get_user_profile_details",
                "Details of one user profile.",
                schema!(object {
                    required: { "profile_key": string }
                }),
            ),
            |args| {
                let key = get_path_segment(args, "profile_key")?;
                Ok(UpstreamRequest::get(format!("/profiles/{}", key)))
            },
            |_, r| payload(json!({ "profile": r })),
        ),
        Operation::upstream(
            ToolDef::new(
                "update_user_profile",
                "Update profile settings (title, messagingActive, team, email, ...).",
                schema!(object {
                    required: { "profile_key": string, "settings": object }
                }),
            ),
            build_update_profile,
            |args, r| {
                payload(json!({
                    "profile_key": echo(args, "profile_key"),
                    "updated": true,
                    "result": r,
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "delete_user_profile",
                "Delete a user profile.",
                schema!(object {
                    required: { "profile_key": string }
                }),
            ),
            |args| {
                let key = get_path_segment(args, "profile_key")?;
                Ok(UpstreamRequest::delete(format!("/profiles/{}", key)))
            },
            |args, r| {
                payload(json!({
                    "profile_key": echo(args, "profile_key"),
                    "deleted": true,
                    "result": r,
                }))
            },
        ),
    ]
}
