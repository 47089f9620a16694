//! Direct message tools. Only Facebook, Instagram and Twitter/X carry DMs.
//!
//! Tools: send_direct_message, get_message_conversations,
//! get_conversation_history, mark_messages_as_read

use serde_json::json;

use crate::client::UpstreamRequest;
use crate::convert::{
    count_of, field, field_or, get_optional_string_list, get_optional_u64, get_platform_arg,
    get_string_arg, get_string_list, require_platforms_in,
};
use crate::error::Result;
use crate::platform::Platform;
use crate::schema;
use crate::tools::{echo, echo_platform, payload, Args, Body, Operation, ToolDef};

const DM_PLATFORMS: [Platform; 3] = [Platform::Facebook, Platform::Instagram, Platform::Twitter];

fn dm_platform(args: &Args) -> Result<Platform> {
    let platform = get_platform_arg(args, "platform")?;
    require_platforms_in("platform", &[platform], &DM_PLATFORMS)?;
    Ok(platform)
}

/// Get all direct message operations.
pub fn operations() -> Vec<Operation> {
    vec![
        Operation::upstream(
            ToolDef::new(
                "send_direct_message",
                "Send a direct message on facebook, instagram or twitter.",
                schema!(object {
                    required: { "platform": platform, "recipient_id": string, "message": string },
                    optional: { "media_urls": array_string }
                }),
            ),
            |args| {
                let body = Body::new()
                    .set("platform", dm_platform(args)?.as_str())
                    .set("recipientId", get_string_arg(args, "recipient_id")?)
                    .set("message", get_string_arg(args, "message")?)
                    .set_opt("mediaUrls", get_optional_string_list(args, "media_urls")?);
                Ok(UpstreamRequest::post("/messages/send", body.build()))
            },
            |args, r| {
                payload(json!({
                    "message_id": field(&r, "id"),
                    "platform": echo_platform(args),
                    "recipient_id": echo(args, "recipient_id"),
                    "warnings": field_or(&r, "warnings", json!([])),
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "get_message_conversations",
                "List direct message conversations on a platform.",
                schema!(object {
                    required: { "platform": platform },
                    optional: { "limit": integer }
                }),
            ),
            |args| {
                let body = Body::new()
                    .set("platform", dm_platform(args)?.as_str())
                    .set_opt("limit", get_optional_u64(args, "limit")?);
                Ok(UpstreamRequest::post("/messages/conversations", body.build()))
            },
            |args, r| {
                payload(json!({
                    "platform": echo_platform(args),
                    "total_conversations": count_of(&r, "conversations"),
                    "conversations": field_or(&r, "conversations", json!([])),
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "get_conversation_history",
                "Messages in one conversation.",
                schema!(object {
                    required: { "conversation_id": string, "platform": platform },
                    optional: { "limit": integer }
                }),
            ),
            |args| {
                let body = Body::new()
                    .set("conversationId", get_string_arg(args, "conversation_id")?)
                    .set("platform", dm_platform(args)?.as_str())
                    .set_opt("limit", get_optional_u64(args, "limit")?);
                Ok(UpstreamRequest::post("/messages/get", body.build()))
            },
            |args, r| {
                payload(json!({
                    "conversation_id": echo(args, "conversation_id"),
                    "platform": echo_platform(args),
                    "total_messages": count_of(&r, "messages"),
                    "messages": field_or(&r, "messages", json!([])),
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "mark_messages_as_read",
                "Mark messages as read.",
                schema!(object {
                    required: { "message_ids": array_string, "platform": platform }
                }),
            ),
            |args| {
                let body = Body::new()
                    .set("messageIds", get_string_list(args, "message_ids")?)
                    .set("platform", dm_platform(args)?.as_str());
                Ok(UpstreamRequest::post("/messages/read", body.build()))
            },
            |args, r| {
                let marked = get_string_list(args, "message_ids").map_or(0, |ids| ids.len());
                payload(json!({
                    "marked_read": marked,
                    "platform": echo_platform(args),
                    "result": r,
                }))
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_dm_platforms_are_accepted() {
        let ok = json!({"platform": "X"}).as_object().cloned().unwrap();
        assert_eq!(dm_platform(&ok).unwrap(), Platform::Twitter);
        let bad = json!({"platform": "linkedin"}).as_object().cloned().unwrap();
        assert!(dm_platform(&bad).is_err());
    }

    #[test]
    fn replies_report_the_canonical_platform() {
        let ops = operations();
        let send = ops.iter().find(|o| o.def.name == "send_direct_message").unwrap();
        let crate::tools::Handler::Upstream { map, .. } = send.handler else {
            panic!("send_direct_message should call upstream");
        };
        let args = json!({"platform": "X", "recipient_id": "u1", "message": "hi"})
            .as_object()
            .cloned()
            .unwrap();
        let out = map(&args, json!({"id": "m1"}));
        assert_eq!(out["platform"], "twitter");
        assert_eq!(out["message_id"], "m1");
    }
}
