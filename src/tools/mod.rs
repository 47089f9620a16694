//! Tool registry and dispatch.
//!
//! Every tool is an [`Operation`]: a definition for `tools/list` plus a
//! handler. Upstream handlers are a pair of plain functions, one that
//! validates arguments and builds the outbound request and one that maps the
//! upstream response into the envelope payload. The registry is built once
//! at startup and owns the lookup from name to operation.

pub mod account;
pub mod ads;
pub mod analytics;
pub mod automation;
pub mod brand;
pub mod comments;
pub mod feeds;
pub mod generate;
pub mod hashtags;
pub mod history;
pub mod links;
pub mod media;
pub mod messages;
pub mod operational;
pub mod profiles;
pub mod publishing;
pub mod reviews;
pub mod utilities;
pub mod validation;
pub mod webhooks;

use std::collections::HashMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use tracing::{debug, info, warn};

use crate::client::UpstreamRequest;
use crate::convert::{get_optional_platforms, get_optional_string, get_platform_arg, platform_names};
use crate::envelope::Envelope;
use crate::error::{McpError, Result};
use crate::session::McpSession;

/// A tool definition for the MCP tools/list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDef {
    /// Tool name (e.g., "post_to_social")
    pub name: String,
    /// Tool description
    pub description: String,
    /// JSON Schema for the input parameters
    #[serde(rename = "inputSchema")]
    pub input_schema: JsonValue,
}

impl ToolDef {
    /// Create a new tool definition.
    pub fn new(name: &str, description: &str, input_schema: JsonValue) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
        }
    }
}

/// Tool arguments as received from the client.
pub type Args = Map<String, JsonValue>;

/// Envelope payload fields.
pub type Payload = Map<String, JsonValue>;

/// Validates arguments and builds the upstream request.
pub type BuildFn = fn(&Args) -> Result<UpstreamRequest>;

/// Maps an upstream response (with the original arguments) into a payload.
pub type MapFn = fn(&Args, JsonValue) -> Payload;

/// Answers locally without an upstream call.
pub type LocalFn = fn(&McpSession, &Args) -> Result<Payload>;

/// How a tool produces its result.
#[derive(Clone, Copy)]
pub enum Handler {
    /// Computed in-process
    Local(LocalFn),
    /// One upstream call
    Upstream {
        /// Validation and request construction
        build: BuildFn,
        /// Response mapping
        map: MapFn,
    },
}

/// A registered tool.
#[derive(Clone)]
pub struct Operation {
    /// Definition advertised to clients
    pub def: ToolDef,
    /// Handler
    pub handler: Handler,
    /// Whether calls count against the rate limiter
    pub rate_limited: bool,
}

impl Operation {
    /// A tool backed by one upstream call.
    pub fn upstream(def: ToolDef, build: BuildFn, map: MapFn) -> Self {
        Self {
            def,
            handler: Handler::Upstream { build, map },
            rate_limited: true,
        }
    }

    /// A tool answered locally.
    pub fn local(def: ToolDef, handler: LocalFn) -> Self {
        Self {
            def,
            handler: Handler::Local(handler),
            rate_limited: true,
        }
    }

    /// Exempt this tool from rate limiting.
    pub fn unlimited(mut self) -> Self {
        self.rate_limited = false;
        self
    }

    async fn run(&self, session: &McpSession, args: &Args) -> Result<Payload> {
        if self.rate_limited {
            session.admit()?;
        }
        match self.handler {
            Handler::Local(handler) => handler(session, args),
            Handler::Upstream { build, map } => {
                let request = build(args)?;
                let response = session.execute(request).await?;
                Ok(map(args, response))
            }
        }
    }
}

/// Registry of available MCP tools.
pub struct ToolRegistry {
    tools: Vec<ToolDef>,
    operations: HashMap<String, Operation>,
}

impl ToolRegistry {
    /// Create the registry with every tool category.
    pub fn new() -> Self {
        let mut operations = Vec::new();
        operations.extend(publishing::operations());
        operations.extend(analytics::operations());
        operations.extend(comments::operations());
        operations.extend(messages::operations());
        operations.extend(reviews::operations());
        operations.extend(webhooks::operations());
        operations.extend(links::operations());
        operations.extend(ads::operations());
        operations.extend(profiles::operations());
        operations.extend(history::operations());
        operations.extend(media::operations());
        operations.extend(automation::operations());
        operations.extend(brand::operations());
        operations.extend(feeds::operations());
        operations.extend(generate::operations());
        operations.extend(hashtags::operations());
        operations.extend(account::operations());
        operations.extend(utilities::operations());
        operations.extend(validation::operations());
        operations.extend(operational::operations());
        Self::from_operations(operations)
    }

    /// Build a registry from an explicit operation list.
    pub fn from_operations(operations: Vec<Operation>) -> Self {
        let tools = operations.iter().map(|op| op.def.clone()).collect();
        let operations = operations
            .into_iter()
            .map(|op| (op.def.name.clone(), op))
            .collect();
        Self { tools, operations }
    }

    /// Get all tool definitions.
    pub fn tools(&self) -> &[ToolDef] {
        &self.tools
    }

    /// Whether a tool with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    /// Invoke a tool.
    ///
    /// Only an unknown tool name is an `Err`; every handler-level failure is
    /// folded into a failure [`Envelope`].
    pub async fn call(&self, session: &McpSession, name: &str, args: Args) -> Result<Envelope> {
        let operation = self
            .operations
            .get(name)
            .ok_or_else(|| McpError::UnknownTool(name.to_string()))?;

        debug!(tool = name, "Tool call started");
        let started = Instant::now();
        let outcome = operation.run(session, &args).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        let envelope = match outcome {
            Ok(payload) => {
                info!(tool = name, duration_ms, success = true, "Tool call completed");
                Envelope::success(payload)
            }
            Err(err) => {
                let envelope = Envelope::from_error(&err, session.secrets());
                if let Envelope::Failure { kind, message } = &envelope {
                    warn!(
                        tool = name,
                        duration_ms,
                        success = false,
                        local = err.is_local(),
                        error_type = %kind,
                        error = %message,
                        "Tool call failed"
                    );
                }
                envelope
            }
        };
        Ok(envelope)
    }

    /// Invoke a tool and render the envelope as JSON.
    pub async fn dispatch(&self, session: &McpSession, name: &str, args: Args) -> Result<JsonValue> {
        Ok(self.call(session, name, args).await?.to_json())
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Request body under construction. Absent optional values are left out.
#[derive(Debug, Default)]
pub struct Body(Map<String, JsonValue>);

impl Body {
    /// Empty body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field.
    pub fn set(mut self, key: &str, value: impl Into<JsonValue>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Set a field when the value is present.
    pub fn set_opt<T: Into<JsonValue>>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.set(key, v),
            None => self,
        }
    }

    /// Merge caller-supplied fields without overwriting ones already set.
    pub fn merge(mut self, extra: Option<Map<String, JsonValue>>) -> Self {
        for (k, v) in extra.into_iter().flatten() {
            self.0.entry(k).or_insert(v);
        }
        self
    }

    /// Finish as a JSON value.
    pub fn build(self) -> JsonValue {
        JsonValue::Object(self.0)
    }
}

/// Turn a `json!({...})` literal into a payload map.
pub fn payload(value: JsonValue) -> Payload {
    match value {
        JsonValue::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("result".to_string(), other);
            map
        }
    }
}

/// The normalized `platforms` argument, or `fallback` when it was omitted.
pub fn echo_platforms(args: &Args, fallback: &str) -> JsonValue {
    match get_optional_platforms(args, "platforms") {
        Ok(Some(platforms)) => platform_names(&platforms),
        _ => JsonValue::from(fallback),
    }
}

/// The normalized single `platform` argument, or null when it is absent or
/// unsupported.
pub fn echo_platform(args: &Args) -> JsonValue {
    get_platform_arg(args, "platform")
        .map(|p| JsonValue::from(p.as_str()))
        .unwrap_or(JsonValue::Null)
}

/// Echo an optional string argument back, or null.
pub fn echo(args: &Args, name: &str) -> JsonValue {
    args.get(name).cloned().unwrap_or(JsonValue::Null)
}

/// Echo an optional string argument back, or `fallback` when absent or blank.
pub fn echo_or(args: &Args, name: &str, fallback: &str) -> JsonValue {
    match get_optional_string(args, name) {
        Ok(Some(value)) => JsonValue::from(value),
        _ => JsonValue::from(fallback),
    }
}

/// Helper macro for creating JSON Schema for tool input parameters.
#[macro_export]
macro_rules! schema {
    // Object with required and optional properties
    (object {
        required: { $($req_name:literal : $req_type:tt),* $(,)? },
        optional: { $($opt_name:literal : $opt_type:tt),* $(,)? }
    }) => {{
        let mut required: Vec<&str> = Vec::new();
        $(required.push($req_name);)*

        let mut props = serde_json::Map::new();
        $(props.insert($req_name.to_string(), $crate::schema!(@type $req_type));)*
        $(props.insert($opt_name.to_string(), $crate::schema!(@type $opt_type));)*

        serde_json::json!({
            "type": "object",
            "properties": props,
            "required": required
        })
    }};

    // Object with only required properties
    (object {
        required: { $($req_name:literal : $req_type:tt),* $(,)? }
    }) => {{
        let mut required: Vec<&str> = Vec::new();
        $(required.push($req_name);)*

        let mut props = serde_json::Map::new();
        $(props.insert($req_name.to_string(), $crate::schema!(@type $req_type));)*

        serde_json::json!({
            "type": "object",
            "properties": props,
            "required": required
        })
    }};

    // Object with only optional properties
    (object {
        optional: { $($opt_name:literal : $opt_type:tt),* $(,)? }
    }) => {{
        let mut props = serde_json::Map::new();
        $(props.insert($opt_name.to_string(), $crate::schema!(@type $opt_type));)*

        serde_json::json!({
            "type": "object",
            "properties": props,
            "required": []
        })
    }};

    // Empty object (no parameters)
    (object {}) => {{
        serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }};

    // Type mappings
    (@type string) => { serde_json::json!({"type": "string"}) };
    (@type number) => { serde_json::json!({"type": "number"}) };
    (@type integer) => { serde_json::json!({"type": "integer"}) };
    (@type boolean) => { serde_json::json!({"type": "boolean"}) };
    (@type object) => { serde_json::json!({"type": "object"}) };
    (@type any) => { serde_json::json!({}) };
    (@type datetime) => { serde_json::json!({"type": "string", "format": "date-time"}) };
    (@type platform) => {
        serde_json::json!({"type": "string", "enum": $crate::platform::Platform::ALL.iter().map(|p| p.as_str()).collect::<Vec<_>>()})
    };
    (@type platforms) => {
        serde_json::json!({
            "type": "array",
            "items": {"type": "string", "enum": $crate::platform::Platform::ALL.iter().map(|p| p.as_str()).collect::<Vec<_>>()}
        })
    };
    (@type array_string) => { serde_json::json!({"type": "array", "items": {"type": "string"}}) };
    (@type array_object) => { serde_json::json!({"type": "array", "items": {"type": "object"}}) };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn tool_names_are_unique() {
        let registry = ToolRegistry::new();
        let names: HashSet<_> = registry.tools().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names.len(), registry.tools().len());
        assert!(registry.contains("post_to_social"));
        assert!(registry.contains("server_health"));
        assert!(!registry.contains("launch_rocket"));
    }

    #[test]
    fn schemas_are_objects_with_required_lists() {
        for tool in ToolRegistry::new().tools() {
            assert_eq!(tool.input_schema["type"], "object", "{}", tool.name);
            assert!(tool.input_schema["required"].is_array(), "{}", tool.name);
            for req in tool.input_schema["required"].as_array().unwrap() {
                let key = req.as_str().unwrap();
                assert!(
                    tool.input_schema["properties"].get(key).is_some(),
                    "{}: required '{}' has no property",
                    tool.name,
                    key
                );
            }
        }
    }

    #[test]
    fn body_skips_absent_values() {
        let body = Body::new()
            .set("post", "hi")
            .set_opt::<String>("scheduleDate", None)
            .set_opt("notes", Some("n"))
            .build();
        assert_eq!(body, serde_json::json!({"post": "hi", "notes": "n"}));
    }

    #[test]
    fn body_merge_keeps_explicit_fields() {
        let mut extra = Map::new();
        extra.insert("post".into(), "override".into());
        extra.insert("extra".into(), true.into());
        let body = Body::new().set("post", "hi").merge(Some(extra)).build();
        assert_eq!(body, serde_json::json!({"post": "hi", "extra": true}));
    }

    #[test]
    fn echo_platform_normalizes_aliases() {
        let args = serde_json::json!({"platform": "X"}).as_object().cloned().unwrap();
        assert_eq!(echo_platform(&args), "twitter");
        let bad = serde_json::json!({"platform": "myspace"}).as_object().cloned().unwrap();
        assert_eq!(echo_platform(&bad), JsonValue::Null);
        assert_eq!(echo_platform(&Map::new()), JsonValue::Null);
    }

    #[test]
    fn schema_macro_shapes() {
        let s = schema!(object {
            required: { "post_id": string },
            optional: { "platforms": platforms }
        });
        assert_eq!(s["required"], serde_json::json!(["post_id"]));
        assert_eq!(s["properties"]["platforms"]["type"], "array");
        assert_eq!(
            s["properties"]["platforms"]["items"]["enum"].as_array().unwrap().len(),
            13
        );
        let empty = schema!(object {});
        assert_eq!(empty["required"], serde_json::json!([]));
    }
}
