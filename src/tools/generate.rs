//! AI generation tools (Max Pack add-on upstream).
//!
//! Tools: ai_generate_post_text, ai_generate_hashtags_for_content,
//! ai_generate_image_caption

use serde_json::json;

use crate::client::UpstreamRequest;
use crate::convert::{field, get_optional_string, get_optional_u64, get_platform_arg, get_string_arg};
use crate::schema;
use crate::tools::{payload, Body, Operation, ToolDef};

/// Get all generation operations.
pub fn operations() -> Vec<Operation> {
    vec![
        Operation::upstream(
            ToolDef::new(
                "ai_generate_post_text",
                "Generate post text from a prompt, optionally tuned for a platform and tone.",
                schema!(object {
                    required: { "prompt": string },
                    optional: { "platform": platform, "tone": string }
                }),
            ),
            |args| {
                let platform = match get_optional_string(args, "platform")? {
                    Some(_) => Some(get_platform_arg(args, "platform")?.as_str()),
                    None => None,
                };
                let body = Body::new()
                    .set("prompt", get_string_arg(args, "prompt")?)
                    .set_opt("platform", platform)
                    .set_opt("tone", get_optional_string(args, "tone")?);
                Ok(UpstreamRequest::post("/generate/text", body.build()))
            },
            |_, r| payload(json!({ "generated_text": field(&r, "text"), "result": r })),
        ),
        Operation::upstream(
            ToolDef::new(
                "ai_generate_hashtags_for_content",
                "Generate hashtags for a piece of content.",
                schema!(object {
                    required: { "content": string },
                    optional: { "count": integer }
                }),
            ),
            |args| {
                let body = Body::new()
                    .set("content", get_string_arg(args, "content")?)
                    .set_opt("count", get_optional_u64(args, "count")?.filter(|n| *n > 0));
                Ok(UpstreamRequest::post("/generate/hashtags", body.build()))
            },
            |_, r| payload(json!({ "hashtags": field(&r, "hashtags"), "result": r })),
        ),
        Operation::upstream(
            ToolDef::new(
                "ai_generate_image_caption",
                "Generate a caption for an image.",
                schema!(object {
                    required: { "image_url": string },
                    optional: { "style": string }
                }),
            ),
            |args| {
                let body = Body::new()
                    .set("imageUrl", get_string_arg(args, "image_url")?)
                    .set_opt("style", get_optional_string(args, "style")?);
                Ok(UpstreamRequest::post("/generate/caption", body.build()))
            },
            |_, r| payload(json!({ "caption": field(&r, "caption"), "result": r })),
        ),
    ]
}
