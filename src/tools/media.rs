//! Media library tools.
//!
//! Tools: upload_media, validate_media_url, get_unsplash_image, list_all_media,
//! get_media_item_details, delete_media_file

use serde_json::{json, Value as JsonValue};

use crate::client::UpstreamRequest;
use crate::convert::{
    count_of, field, field_or, get_optional_string, get_optional_u64, get_path_segment,
    get_string_arg,
};
use crate::error::{McpError, Result};
use crate::schema;
use crate::tools::{echo, payload, Args, Body, Operation, ToolDef};

fn build_unsplash(args: &Args) -> Result<UpstreamRequest> {
    let query = get_optional_string(args, "query")?;
    let image_id = get_optional_string(args, "image_id")?;
    if query.is_none() && image_id.is_none() {
        return Err(McpError::invalid(
            "query",
            "either query or image_id must be provided",
        ));
    }
    let body = Body::new()
        .set_opt("query", query)
        .set_opt("imageId", image_id);
    Ok(UpstreamRequest::post("/media/unsplash", body.build()))
}

fn echo_or_field(args: &Args, name: &str, response: &JsonValue, key: &str) -> JsonValue {
    match args.get(name) {
        Some(JsonValue::String(s)) if !s.trim().is_empty() => JsonValue::from(s.clone()),
        _ => field(response, key),
    }
}

/// Get all media operations.
pub fn operations() -> Vec<Operation> {
    vec![
        Operation::upstream(
            ToolDef::new(
                "upload_media",
                "Copy an image or video from a public URL into the media library.",
                schema!(object {
                    required: { "file_url": string },
                    optional: { "file_name": string }
                }),
            ),
            |args| {
                let body = Body::new()
                    .set("url", get_string_arg(args, "file_url")?)
                    .set_opt("fileName", get_optional_string(args, "file_name")?);
                Ok(UpstreamRequest::post("/media/upload", body.build()))
            },
            |args, r| {
                payload(json!({
                    "uploaded": true,
                    "original_url": echo(args, "file_url"),
                    "library_url": field(&r, "url"),
                    "file_name": echo(args, "file_name"),
                    "details": r,
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "validate_media_url",
                "Check that a media URL is reachable and in an accepted format.",
                schema!(object {
                    required: { "media_url": string }
                }),
            ),
            |args| {
                let body = Body::new().set("url", get_string_arg(args, "media_url")?);
                Ok(UpstreamRequest::post("/media/validate", body.build()))
            },
            |args, r| {
                payload(json!({
                    "valid": field_or(&r, "valid", json!(true)),
                    "url": echo(args, "media_url"),
                    "issues": field_or(&r, "issues", json!([])),
                    "details": r,
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "get_unsplash_image",
                "Royalty-free image from Unsplash, by search query or image id.",
                schema!(object {
                    optional: { "query": string, "image_id": string }
                }),
            ),
            build_unsplash,
            |args, r| {
                payload(json!({
                    "image_url": field(&r, "url"),
                    "query": echo(args, "query"),
                    "image_id": echo_or_field(args, "image_id", &r, "id"),
                    "attribution": field(&r, "attribution"),
                    "photographer": field(&r, "photographer"),
                    "details": r,
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "list_all_media",
                "Files in the media library.",
                schema!(object {
                    optional: { "limit": integer, "cursor": string }
                }),
            ),
            |args| {
                Ok(UpstreamRequest::get("/media")
                    .with_optional_query("limit", get_optional_u64(args, "limit")?.map(|n| n.to_string()))
                    .with_optional_query("cursor", get_optional_string(args, "cursor")?))
            },
            |_, r| {
                payload(json!({
                    "total_media": count_of(&r, "media"),
                    "media": field_or(&r, "media", json!([])),
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "get_media_item_details",
                "Details of one media library item.",
                schema!(object {
                    required: { "media_id": string }
                }),
            ),
            |args| {
                let id = get_path_segment(args, "media_id")?;
                Ok(UpstreamRequest::get(format!("/media/{}", id)))
            },
            |_, r| payload(json!({ "media": r })),
        ),
        Operation::upstream(
            ToolDef::new(
                "delete_media_file",
                "Remove a file from the media library.",
                schema!(object {
                    required: { "media_id": string }
                }),
            ),
            |args| {
                let id = get_path_segment(args, "media_id")?;
                Ok(UpstreamRequest::delete(format!("/media/{}", id)))
            },
            |args, r| {
                payload(json!({
                    "media_id": echo(args, "media_id"),
                    "deleted": true,
                    "result": r,
                }))
            },
        ),
    ]
}
