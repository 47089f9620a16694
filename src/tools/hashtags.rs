//! Hashtag research tools.
//!
//! Tools: suggest_relevant_hashtags, get_trending_platform_hashtags,
//! analyze_hashtag_metrics

use serde_json::json;

use crate::client::UpstreamRequest;
use crate::convert::{
    count_of, field_or, get_optional_string, get_platform_arg, get_string_arg, require_one_of,
};
use crate::error::Result;
use crate::schema;
use crate::tools::{echo, echo_or, payload, Args, Body, Operation, ToolDef};

const TIME_RANGES: &[&str] = &["7d", "30d", "90d"];

/// Canonical name of an optional `platform` argument.
fn optional_platform(args: &Args) -> Result<Option<&'static str>> {
    match get_optional_string(args, "platform")? {
        Some(_) => Ok(Some(get_platform_arg(args, "platform")?.as_str())),
        None => Ok(None),
    }
}

/// Get all hashtag operations.
pub fn operations() -> Vec<Operation> {
    vec![
        Operation::upstream(
            ToolDef::new(
                "suggest_relevant_hashtags",
                "Hashtag suggestions for a piece of content.",
                schema!(object {
                    required: { "content": string },
                    optional: { "platform": platform }
                }),
            ),
            |args| {
                let body = Body::new()
                    .set("content", get_string_arg(args, "content")?)
                    .set_opt("platform", optional_platform(args)?);
                Ok(UpstreamRequest::post("/hashtags/suggest", body.build()))
            },
            |_, r| {
                payload(json!({
                    "hashtags": field_or(&r, "hashtags", json!([])),
                    "total_suggestions": count_of(&r, "hashtags"),
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "get_trending_platform_hashtags",
                "Trending hashtags on a platform, optionally for one region (e.g. US, UK).",
                schema!(object {
                    required: { "platform": platform },
                    optional: { "region": string }
                }),
            ),
            |args| {
                let platform = get_platform_arg(args, "platform")?;
                Ok(UpstreamRequest::get("/hashtags/trending")
                    .with_query("platform", platform.as_str())
                    .with_optional_query("region", get_optional_string(args, "region")?))
            },
            |args, r| {
                let platform = optional_platform(args).ok().flatten();
                payload(json!({
                    "platform": platform,
                    "region": echo_or(args, "region", "global"),
                    "trending_hashtags": field_or(&r, "hashtags", json!([])),
                    "total_trending": count_of(&r, "hashtags"),
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "analyze_hashtag_metrics",
                "Performance metrics for one hashtag over 7d, 30d or 90d.",
                schema!(object {
                    required: { "hashtag": string },
                    optional: { "time_range": string }
                }),
            ),
            |args| {
                let time_range = get_optional_string(args, "time_range")?
                    .map(|t| require_one_of("time_range", t, TIME_RANGES))
                    .transpose()?;
                let body = Body::new()
                    .set("hashtag", get_string_arg(args, "hashtag")?)
                    .set_opt("timeRange", time_range);
                Ok(UpstreamRequest::post("/hashtags/analyze", body.build()))
            },
            |args, r| {
                payload(json!({
                    "hashtag": echo(args, "hashtag"),
                    "time_range": echo_or(args, "time_range", "default"),
                    "analytics": r,
                }))
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::Handler;

    fn build_for(name: &str, args: serde_json::Value) -> Result<UpstreamRequest> {
        let op = operations()
            .into_iter()
            .find(|op| op.def.name == name)
            .unwrap();
        let Handler::Upstream { build, .. } = op.handler else {
            panic!("expected an upstream handler");
        };
        build(args.as_object().unwrap())
    }

    #[test]
    fn time_range_is_restricted() {
        assert!(build_for("analyze_hashtag_metrics", json!({"hashtag": "#rust", "time_range": "1y"})).is_err());
        let req = build_for("analyze_hashtag_metrics", json!({"hashtag": "#rust", "time_range": "30d"})).unwrap();
        assert_eq!(req.body.unwrap(), json!({"hashtag": "#rust", "timeRange": "30d"}));
    }

    #[test]
    fn trending_sends_platform_as_query() {
        let req = build_for("get_trending_platform_hashtags", json!({"platform": "TikTok", "region": "US"})).unwrap();
        assert_eq!(req.path, "/hashtags/trending");
        assert_eq!(
            req.query,
            vec![
                ("platform".to_string(), "tiktok".to_string()),
                ("region".to_string(), "US".to_string()),
            ]
        );
    }
}
