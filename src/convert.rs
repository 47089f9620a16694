//! Argument extraction and validation helpers.
//!
//! Tool arguments arrive as a JSON object. These helpers pull typed values out
//! of it and report [`McpError::MissingArg`] / [`McpError::InvalidArg`] so that
//! validation failures never reach the network.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value as JsonValue};

use crate::error::{McpError, Result};
use crate::platform::Platform;

fn present<'a>(args: &'a Map<String, JsonValue>, name: &str) -> Option<&'a JsonValue> {
    args.get(name).filter(|v| !v.is_null())
}

/// Helper to get a required, non-blank string argument.
pub fn get_string_arg(args: &Map<String, JsonValue>, name: &str) -> Result<String> {
    match present(args, name) {
        None => Err(McpError::MissingArg(name.to_string())),
        Some(JsonValue::String(s)) if s.trim().is_empty() => {
            Err(McpError::MissingArg(name.to_string()))
        }
        Some(JsonValue::String(s)) => Ok(s.clone()),
        Some(_) => Err(McpError::invalid(name, "expected a string")),
    }
}

/// Helper to get a required identifier that is placed into a URL path.
pub fn get_path_segment(args: &Map<String, JsonValue>, name: &str) -> Result<String> {
    let value = get_string_arg(args, name)?;
    if value
        .chars()
        .any(|c| matches!(c, '/' | '?' | '#' | '%' | '\\') || c.is_whitespace() || c.is_control())
    {
        return Err(McpError::invalid(name, "must not contain path or query characters"));
    }
    Ok(value)
}

/// Helper to get an optional string argument. Blank strings count as absent.
pub fn get_optional_string(args: &Map<String, JsonValue>, name: &str) -> Result<Option<String>> {
    match present(args, name) {
        None => Ok(None),
        Some(JsonValue::String(s)) if s.trim().is_empty() => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(McpError::invalid(name, "expected a string")),
    }
}

/// Helper to get a required u64 argument.
pub fn get_u64_arg(args: &Map<String, JsonValue>, name: &str) -> Result<u64> {
    get_optional_u64(args, name)?.ok_or_else(|| McpError::MissingArg(name.to_string()))
}

/// Helper to get an optional u64 argument.
pub fn get_optional_u64(args: &Map<String, JsonValue>, name: &str) -> Result<Option<u64>> {
    match present(args, name) {
        None => Ok(None),
        Some(v) => v
            .as_u64()
            .map(Some)
            .ok_or_else(|| McpError::invalid(name, "expected a non-negative integer")),
    }
}

/// Helper to get a required number argument.
pub fn get_f64_arg(args: &Map<String, JsonValue>, name: &str) -> Result<f64> {
    get_optional_f64(args, name)?.ok_or_else(|| McpError::MissingArg(name.to_string()))
}

/// Helper to get an optional number argument.
pub fn get_optional_f64(args: &Map<String, JsonValue>, name: &str) -> Result<Option<f64>> {
    match present(args, name) {
        None => Ok(None),
        Some(v) => v
            .as_f64()
            .map(Some)
            .ok_or_else(|| McpError::invalid(name, "expected a number")),
    }
}

/// Helper to get an optional boolean argument.
pub fn get_optional_bool(args: &Map<String, JsonValue>, name: &str) -> Result<Option<bool>> {
    match present(args, name) {
        None => Ok(None),
        Some(v) => v
            .as_bool()
            .map(Some)
            .ok_or_else(|| McpError::invalid(name, "expected a boolean")),
    }
}

/// Helper to get a required JSON object argument.
pub fn get_object_arg(
    args: &Map<String, JsonValue>,
    name: &str,
) -> Result<Map<String, JsonValue>> {
    get_optional_object(args, name)?.ok_or_else(|| McpError::MissingArg(name.to_string()))
}

/// Helper to get an optional JSON object argument.
pub fn get_optional_object(
    args: &Map<String, JsonValue>,
    name: &str,
) -> Result<Option<Map<String, JsonValue>>> {
    match present(args, name) {
        None => Ok(None),
        Some(JsonValue::Object(obj)) => Ok(Some(obj.clone())),
        Some(_) => Err(McpError::invalid(name, "expected an object")),
    }
}

/// Helper to get a required, non-empty array of objects.
pub fn get_object_list(args: &Map<String, JsonValue>, name: &str) -> Result<Vec<JsonValue>> {
    match present(args, name) {
        None => Err(McpError::MissingArg(name.to_string())),
        Some(JsonValue::Array(items)) if items.is_empty() => {
            Err(McpError::invalid(name, "must not be empty"))
        }
        Some(JsonValue::Array(items)) if items.iter().all(JsonValue::is_object) => {
            Ok(items.clone())
        }
        Some(_) => Err(McpError::invalid(name, "expected an array of objects")),
    }
}

/// Parse a string list. Arrays must hold strings; a bare string is split on
/// commas. Blank entries are dropped.
pub fn string_list(name: &str, value: &JsonValue) -> Result<Vec<String>> {
    let items: Vec<String> = match value {
        JsonValue::Array(items) => items
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| McpError::invalid(name, "expected an array of strings"))
            })
            .collect::<Result<_>>()?,
        JsonValue::String(s) => s.split(',').map(str::to_string).collect(),
        _ => return Err(McpError::invalid(name, "expected an array of strings")),
    };
    Ok(items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

/// Helper to get a required, non-empty string list.
pub fn get_string_list(args: &Map<String, JsonValue>, name: &str) -> Result<Vec<String>> {
    let list = present(args, name)
        .ok_or_else(|| McpError::MissingArg(name.to_string()))
        .and_then(|v| string_list(name, v))?;
    if list.is_empty() {
        return Err(McpError::MissingArg(name.to_string()));
    }
    Ok(list)
}

/// Helper to get an optional string list. An empty list counts as absent.
pub fn get_optional_string_list(
    args: &Map<String, JsonValue>,
    name: &str,
) -> Result<Option<Vec<String>>> {
    match present(args, name) {
        None => Ok(None),
        Some(v) => {
            let list = string_list(name, v)?;
            Ok((!list.is_empty()).then_some(list))
        }
    }
}

/// Parse platform names, de-duplicated in first-seen order.
pub fn parse_platforms(names: Vec<String>) -> Result<Vec<Platform>> {
    let mut platforms: Vec<Platform> = Vec::with_capacity(names.len());
    for name in names {
        let platform: Platform = name.parse()?;
        if !platforms.contains(&platform) {
            platforms.push(platform);
        }
    }
    Ok(platforms)
}

/// Helper to get a required, non-empty platform list, de-duplicated in
/// first-seen order.
pub fn get_platforms(args: &Map<String, JsonValue>, name: &str) -> Result<Vec<Platform>> {
    parse_platforms(get_string_list(args, name)?)
}

/// Helper to get an optional platform list. An empty list counts as absent.
pub fn get_optional_platforms(
    args: &Map<String, JsonValue>,
    name: &str,
) -> Result<Option<Vec<Platform>>> {
    get_optional_string_list(args, name)?
        .map(parse_platforms)
        .transpose()
}

/// Helper to get a required single platform.
pub fn get_platform_arg(args: &Map<String, JsonValue>, name: &str) -> Result<Platform> {
    get_string_arg(args, name)?
        .parse()
        .map_err(|_| McpError::invalid(name, "unsupported platform"))
}

/// Platform identifiers as a JSON array.
pub fn platform_names(platforms: &[Platform]) -> JsonValue {
    JsonValue::Array(
        platforms
            .iter()
            .map(|p| JsonValue::from(p.as_str()))
            .collect(),
    )
}

/// Restrict platforms to an allowed subset.
pub fn require_platforms_in(name: &str, platforms: &[Platform], allowed: &[Platform]) -> Result<()> {
    if let Some(p) = platforms.iter().find(|p| !allowed.contains(p)) {
        return Err(McpError::invalid(
            name,
            format!(
                "'{}' is not supported here; expected one of: {}",
                p,
                allowed
                    .iter()
                    .map(|p| p.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        ));
    }
    Ok(())
}

/// Parse an ISO-8601 timestamp: RFC 3339 with offset, or a naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]` taken as UTC.
pub fn parse_timestamp(name: &str, value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| {
            McpError::invalid(
                name,
                format!("'{}' is not an ISO-8601 timestamp (e.g. 2025-01-15T10:00:00Z)", value),
            )
        })
}

/// Parse a timestamp that must lie strictly after `now`.
pub fn require_future(name: &str, value: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let at = parse_timestamp(name, value)?;
    if at <= now {
        return Err(McpError::invalid(
            name,
            format!("'{}' must be in the future", value),
        ));
    }
    Ok(at)
}

/// Check an integer lies in `min..=max`.
pub fn require_range(name: &str, value: u64, min: u64, max: u64) -> Result<u64> {
    if value < min || value > max {
        return Err(McpError::invalid(
            name,
            format!("must be between {} and {}, got {}", min, max, value),
        ));
    }
    Ok(value)
}

/// Check a string is one of the allowed values.
pub fn require_one_of(name: &str, value: String, allowed: &[&str]) -> Result<String> {
    if allowed.contains(&value.as_str()) {
        Ok(value)
    } else {
        Err(McpError::invalid(
            name,
            format!("'{}' is not one of: {}", value, allowed.join(", ")),
        ))
    }
}

/// Copy a field out of an upstream response, defaulting to null.
pub fn field(response: &JsonValue, key: &str) -> JsonValue {
    response.get(key).cloned().unwrap_or(JsonValue::Null)
}

/// Copy a field out of an upstream response, with a fallback.
pub fn field_or(response: &JsonValue, key: &str, default: JsonValue) -> JsonValue {
    response
        .get(key)
        .filter(|v| !v.is_null())
        .cloned()
        .unwrap_or(default)
}

/// Length of an array field, or 0.
pub fn count_of(response: &JsonValue, key: &str) -> usize {
    response
        .get(key)
        .and_then(JsonValue::as_array)
        .map_or(0, Vec::len)
}
