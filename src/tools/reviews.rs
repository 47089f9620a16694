//! Google Business Profile review tools.
//!
//! Tools: get_google_business_reviews, respond_to_review, remove_review_response

use serde_json::json;

use crate::client::UpstreamRequest;
use crate::convert::{count_of, field_or, get_optional_string, get_string_arg};
use crate::schema;
use crate::tools::{echo, echo_or, payload, Body, Operation, ToolDef};

/// Get all review operations.
pub fn operations() -> Vec<Operation> {
    vec![
        Operation::upstream(
            ToolDef::new(
                "get_google_business_reviews",
                "Reviews for a Google Business Profile location, or all locations.",
                schema!(object {
                    optional: { "location_id": string }
                }),
            ),
            |args| {
                let body = Body::new().set_opt("locationId", get_optional_string(args, "location_id")?);
                Ok(UpstreamRequest::post("/reviews", body.build()))
            },
            |args, r| {
                payload(json!({
                    "total_reviews": count_of(&r, "reviews"),
                    "reviews": field_or(&r, "reviews", json!([])),
                    "location_id": echo_or(args, "location_id", "all"),
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "respond_to_review",
                "Publish a reply to a review.",
                schema!(object {
                    required: { "review_id": string, "response_text": string }
                }),
            ),
            |args| {
                let body = Body::new()
                    .set("reviewId", get_string_arg(args, "review_id")?)
                    .set("response", get_string_arg(args, "response_text")?);
                Ok(UpstreamRequest::post("/reviews/reply", body.build()))
            },
            |args, r| {
                payload(json!({
                    "review_id": echo(args, "review_id"),
                    "responded": true,
                    "result": r,
                }))
            },
        ),
        Operation::upstream(
            ToolDef::new(
                "remove_review_response",
                "Delete a previously published review reply.",
                schema!(object {
                    required: { "review_id": string }
                }),
            ),
            |args| {
                let body = Body::new().set("reviewId", get_string_arg(args, "review_id")?);
                Ok(UpstreamRequest::delete("/reviews/reply").with_body(body.build()))
            },
            |args, r| {
                payload(json!({
                    "review_id": echo(args, "review_id"),
                    "response_deleted": true,
                    "result": r,
                }))
            },
        ),
    ]
}
