//! Read-only resources.
//!
//! Resources are derived views over one or more upstream calls, addressed by
//! `ayrshare://` URIs. A read is gated by the rate limiter once, before its
//! first upstream call, and either returns the whole document or fails as a
//! whole; partial aggregates are never returned.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use tracing::{debug, info, warn};

use crate::client::UpstreamRequest;
use crate::envelope::Envelope;
use crate::error::{McpError, Result};
use crate::session::McpSession;
use crate::tools::{payload, Payload};

/// URI scheme shared by every resource.
pub const SCHEME: &str = "ayrshare://";

const JSON_MIME: &str = "application/json";
const HISTORY_DAYS: u64 = 30;
const PROFILE_PAGE_SIZE: &str = "100";
const RECENT_ACTIVITY: usize = 5;
const PREVIEW_CHARS: usize = 60;

/// A concrete resource for `resources/list`.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceDef {
    /// Full URI
    pub uri: String,
    /// Short name
    pub name: String,
    /// What the document contains
    pub description: String,
    /// Always `application/json`
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

/// A parameterized resource for `resources/templates/list`.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceTemplate {
    /// RFC 6570 URI template
    #[serde(rename = "uriTemplate")]
    pub uri_template: String,
    /// Short name
    pub name: String,
    /// What the document contains
    pub description: String,
    /// Always `application/json`
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

impl ResourceDef {
    fn new(path: &str, name: &str, description: &str) -> Self {
        Self {
            uri: format!("{}{}", SCHEME, path),
            name: name.to_string(),
            description: description.to_string(),
            mime_type: JSON_MIME.to_string(),
        }
    }
}

impl ResourceTemplate {
    fn new(path: &str, name: &str, description: &str) -> Self {
        Self {
            uri_template: format!("{}{}", SCHEME, path),
            name: name.to_string(),
            description: description.to_string(),
            mime_type: JSON_MIME.to_string(),
        }
    }
}

/// Dashboard reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// Last day
    Daily,
    /// Last 7 days
    Weekly,
    /// Last 30 days
    Monthly,
    /// Last 90 days
    Quarterly,
}

impl Period {
    /// Look-back window in days.
    pub fn days(self) -> u64 {
        match self {
            Period::Daily => 1,
            Period::Weekly => 7,
            Period::Monthly => 30,
            Period::Quarterly => 90,
        }
    }

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::Quarterly => "quarterly",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = McpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(Period::Daily),
            "weekly" => Ok(Period::Weekly),
            "monthly" => Ok(Period::Monthly),
            "quarterly" => Ok(Period::Quarterly),
            _ => Err(McpError::invalid(
                "period",
                format!("'{}' is not one of: daily, weekly, monthly, quarterly", s),
            )),
        }
    }
}

/// Which resource a URI names. Parameters are kept raw and validated when
/// the read runs, after rate limiting.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Route {
    History,
    Platforms,
    Dashboard(String),
    Calendar(String, String),
    ProfilesOverview,
}

impl Route {
    fn parse(uri: &str) -> Option<Self> {
        let path = uri.strip_prefix(SCHEME)?.trim_end_matches('/');
        let segments: Vec<&str> = path.split('/').collect();
        match segments.as_slice() {
            ["history"] => Some(Route::History),
            ["platforms"] => Some(Route::Platforms),
            ["analytics", "dashboard", period] if !period.is_empty() => {
                Some(Route::Dashboard(period.to_string()))
            }
            ["calendar", year, month] if !year.is_empty() && !month.is_empty() => {
                Some(Route::Calendar(year.to_string(), month.to_string()))
            }
            ["profiles", "overview"] => Some(Route::ProfilesOverview),
            _ => None,
        }
    }
}

/// Registry of resources and resource templates.
pub struct ResourceRegistry {
    resources: Vec<ResourceDef>,
    templates: Vec<ResourceTemplate>,
}

impl ResourceRegistry {
    /// Create the registry.
    pub fn new() -> Self {
        let resources = vec![
            ResourceDef::new(
                "history",
                "Post history",
                "Posts from the last 30 days across all connected platforms.",
            ),
            ResourceDef::new(
                "platforms",
                "Connected platforms",
                "Profiles and the social accounts connected to each.",
            ),
            ResourceDef::new(
                "profiles/overview",
                "Profiles overview",
                "Every user profile with active/inactive counts and connected platforms.",
            ),
        ];
        let templates = vec![
            ResourceTemplate::new(
                "analytics/dashboard/{period}",
                "Analytics dashboard",
                "Posting totals, success rate and platform breakdown. \
                 period: daily, weekly, monthly or quarterly.",
            ),
            ResourceTemplate::new(
                "calendar/{year}/{month}",
                "Content calendar",
                "Scheduled posts for one month, grouped by date.",
            ),
        ];
        Self {
            resources,
            templates,
        }
    }

    /// Concrete resources.
    pub fn resources(&self) -> &[ResourceDef] {
        &self.resources
    }

    /// Resource templates.
    pub fn templates(&self) -> &[ResourceTemplate] {
        &self.templates
    }

    /// Read a resource.
    ///
    /// Only a URI that names no resource is an `Err`; everything else,
    /// including bad parameters and upstream failures, is a failure
    /// [`Envelope`].
    pub async fn read(&self, session: &McpSession, uri: &str) -> Result<Envelope> {
        let route = Route::parse(uri).ok_or_else(|| McpError::UnknownResource(uri.to_string()))?;

        debug!(uri, "Resource read started");
        let started = Instant::now();
        let outcome = match session.admit() {
            Ok(()) => read_route(session, &route).await,
            Err(e) => Err(e),
        };
        let duration_ms = started.elapsed().as_millis() as u64;

        let envelope = match outcome {
            Ok(payload) => {
                info!(uri, duration_ms, success = true, "Resource read completed");
                Envelope::success(payload)
            }
            Err(err) => {
                let envelope = Envelope::from_error(&err, session.secrets());
                if let Envelope::Failure { kind, message } = &envelope {
                    warn!(
                        uri,
                        duration_ms,
                        success = false,
                        local = err.is_local(),
                        error_type = %kind,
                        error = %message,
                        "Resource read failed"
                    );
                }
                envelope
            }
        };
        Ok(envelope)
    }
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

async fn read_route(session: &McpSession, route: &Route) -> Result<Payload> {
    match route {
        Route::History => history(session).await,
        Route::Platforms => platforms(session).await,
        Route::Dashboard(period) => dashboard(session, period.parse()?).await,
        Route::Calendar(year, month) => {
            let (year, month) = parse_year_month(year, month)?;
            calendar(session, year, month).await
        }
        Route::ProfilesOverview => profiles_overview(session).await,
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Items of a list response: either a bare array or an array under `key`.
fn items(response: &JsonValue, key: &str) -> Vec<JsonValue> {
    match response {
        JsonValue::Array(items) => items.clone(),
        other => other
            .get(key)
            .and_then(JsonValue::as_array)
            .cloned()
            .unwrap_or_default(),
    }
}

fn str_field<'a>(item: &'a JsonValue, key: &str) -> &'a str {
    item.get(key).and_then(JsonValue::as_str).unwrap_or("")
}

fn string_items(item: &JsonValue, key: &str) -> Vec<String> {
    item.get(key)
        .and_then(JsonValue::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(JsonValue::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let cut: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

// ── History and platforms ───────────────────────────────────────────────

async fn history(session: &McpSession) -> Result<Payload> {
    let response = session
        .execute(UpstreamRequest::post("/history", json!({ "lastDays": HISTORY_DAYS })))
        .await?;
    let posts = items(&response, "posts");
    Ok(payload(json!({
        "days": HISTORY_DAYS,
        "total_posts": posts.len(),
        "posts": posts,
    })))
}

async fn platforms(session: &McpSession) -> Result<Payload> {
    let response = session.execute(UpstreamRequest::get("/profiles")).await?;
    let profiles: Vec<JsonValue> = items(&response, "profiles")
        .iter()
        .map(|profile| {
            json!({
                "title": profile.get("title").cloned().unwrap_or_else(|| json!("Unnamed Profile")),
                "profile_key": profile.get("profileKey").cloned().unwrap_or(JsonValue::Null),
                "active_social_accounts": string_items(profile, "activeSocialAccounts"),
                "connected_accounts": profile.get("connectedAccounts").cloned().unwrap_or_else(|| json!([])),
            })
        })
        .collect();
    Ok(payload(json!({
        "total_profiles": profiles.len(),
        "profiles": profiles,
    })))
}

// ── Analytics dashboard ─────────────────────────────────────────────────

async fn dashboard(session: &McpSession, period: Period) -> Result<Payload> {
    let days = period.days();
    let (history, account_analytics) = tokio::try_join!(
        session.execute(UpstreamRequest::post("/history", json!({ "lastDays": days }))),
        session.execute(UpstreamRequest::post("/analytics/profile", json!({}))),
    )?;
    Ok(summarize_dashboard(
        period,
        &items(&history, "posts"),
        account_analytics,
    ))
}

/// Aggregate a post history into the dashboard document.
pub fn summarize_dashboard(
    period: Period,
    posts: &[JsonValue],
    account_analytics: JsonValue,
) -> Payload {
    let days = period.days();
    let total = posts.len();
    let (mut published, mut failed, mut scheduled) = (0usize, 0usize, 0usize);
    let mut per_platform: HashMap<String, usize> = HashMap::new();

    for post in posts {
        match str_field(post, "status") {
            "success" => published += 1,
            "error" | "failed" => failed += 1,
            "scheduled" | "pending" => scheduled += 1,
            _ => {}
        }
        for platform in string_items(post, "platforms") {
            *per_platform.entry(platform).or_default() += 1;
        }
    }

    let success_rate = match published + failed {
        0 => JsonValue::Null,
        settled => json!(round_to(published as f64 * 100.0 / settled as f64, 1)),
    };
    let per_day = total as f64 / days as f64;
    let consistency = if per_day >= 2.0 {
        "high"
    } else if per_day >= 1.0 {
        "medium"
    } else {
        "low"
    };

    let mut platforms_used: Vec<&String> = per_platform.keys().collect();
    platforms_used.sort();

    let mut breakdown: Vec<(&String, &usize)> = per_platform.iter().collect();
    breakdown.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    let breakdown: Vec<JsonValue> = breakdown
        .into_iter()
        .map(|(name, count)| {
            json!({
                "platform": name,
                "posts": count,
                "percentage": round_to(*count as f64 * 100.0 / total.max(1) as f64, 1),
            })
        })
        .collect();

    let recent: Vec<JsonValue> = posts
        .iter()
        .take(RECENT_ACTIVITY)
        .map(|post| {
            json!({
                "id": post.get("id").cloned().unwrap_or(JsonValue::Null),
                "created": post.get("created").cloned().unwrap_or(JsonValue::Null),
                "status": post.get("status").cloned().unwrap_or_else(|| json!("unknown")),
                "platforms": string_items(post, "platforms"),
            })
        })
        .collect();

    payload(json!({
        "period": period.as_str(),
        "days": days,
        "total_posts": total,
        "published": published,
        "failed": failed,
        "scheduled": scheduled,
        "success_rate": success_rate,
        "average_posts_per_day": round_to(per_day, 2),
        "posting_consistency": consistency,
        "platforms_used": platforms_used,
        "platform_breakdown": breakdown,
        "recent_activity": recent,
        "account_analytics": account_analytics,
    }))
}

// ── Content calendar ────────────────────────────────────────────────────

fn parse_year_month(year: &str, month: &str) -> Result<(u32, u32)> {
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(McpError::invalid("year", format!("'{}' is not a four-digit year", year)));
    }
    let month_num = month
        .parse::<u32>()
        .ok()
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(|| McpError::invalid("month", format!("'{}' is not a month (1-12)", month)))?;
    let year_num = year
        .parse::<u32>()
        .map_err(|_| McpError::invalid("year", format!("'{}' is not a four-digit year", year)))?;
    Ok((year_num, month_num))
}

async fn calendar(session: &McpSession, year: u32, month: u32) -> Result<Payload> {
    let response = session
        .execute(UpstreamRequest::get("/history/scheduled"))
        .await?;
    Ok(build_calendar(year, month, &items(&response, "posts")))
}

/// Bucket scheduled posts of one month by date.
///
/// Buckets are ordered by date and posts within a bucket by (time, id), so
/// the result does not depend on the order posts arrive in.
pub fn build_calendar(year: u32, month: u32, posts: &[JsonValue]) -> Payload {
    let prefix = format!("{:04}-{:02}-", year, month);
    let mut buckets: BTreeMap<String, Vec<(String, String, JsonValue)>> = BTreeMap::new();

    for post in posts {
        let scheduled = str_field(post, "scheduleDate");
        if !scheduled.starts_with(&prefix) {
            continue;
        }
        let (date, time) = match scheduled.split_once('T') {
            Some((date, rest)) => (date, rest.get(..5).unwrap_or(rest)),
            None => (scheduled.get(..10).unwrap_or(scheduled), "00:00"),
        };
        let id = str_field(post, "id").to_string();
        let entry = json!({
            "id": post.get("id").cloned().unwrap_or(JsonValue::Null),
            "time": time,
            "schedule_date": scheduled,
            "platforms": string_items(post, "platforms"),
            "preview": preview(str_field(post, "post")),
        });
        buckets
            .entry(date.to_string())
            .or_default()
            .push((time.to_string(), id, entry));
    }

    let mut total = 0;
    let days: Vec<JsonValue> = buckets
        .into_iter()
        .map(|(date, mut entries)| {
            entries.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));
            total += entries.len();
            json!({
                "date": date,
                "total": entries.len(),
                "posts": entries.into_iter().map(|(_, _, e)| e).collect::<Vec<_>>(),
            })
        })
        .collect();

    payload(json!({
        "year": year,
        "month": month,
        "total_scheduled": total,
        "days": days,
    }))
}

// ── Profiles overview ───────────────────────────────────────────────────

async fn profiles_overview(session: &McpSession) -> Result<Payload> {
    let mut profiles = Vec::new();
    let mut cursor: Option<String> = None;
    let mut seen = HashSet::new();

    loop {
        let request = UpstreamRequest::get("/profiles")
            .with_query("limit", PROFILE_PAGE_SIZE)
            .with_optional_query("cursor", cursor.take());
        let page = session.execute(request).await?;
        profiles.extend(items(&page, "profiles"));

        match page.get("nextCursor").and_then(JsonValue::as_str) {
            Some(next) if !next.is_empty() => {
                if !seen.insert(next.to_string()) {
                    return Err(McpError::Api {
                        status_code: 200,
                        message: format!("Pagination cursor '{}' was returned twice", next),
                        raw_body: None,
                    });
                }
                cursor = Some(next.to_string());
            }
            _ => break,
        }
    }

    Ok(summarize_profiles(&profiles))
}

/// Aggregate counts over every profile.
pub fn summarize_profiles(profiles: &[JsonValue]) -> Payload {
    let mut active = 0usize;
    let mut connected_total = 0usize;
    let details: Vec<JsonValue> = profiles
        .iter()
        .map(|profile| {
            let platforms = string_items(profile, "activeSocialAccounts");
            if !platforms.is_empty() {
                active += 1;
                connected_total += platforms.len();
            }
            json!({
                "title": profile.get("title").cloned().unwrap_or_else(|| json!("Unnamed Profile")),
                "ref_id": profile.get("refId").cloned().unwrap_or(JsonValue::Null),
                "created": profile.get("created").cloned().unwrap_or(JsonValue::Null),
                "connected_platforms": platforms,
            })
        })
        .collect();

    let average = if active == 0 {
        0.0
    } else {
        round_to(connected_total as f64 / active as f64, 1)
    };

    payload(json!({
        "total_profiles": profiles.len(),
        "active_profiles": active,
        "inactive_profiles": profiles.len() - active,
        "total_connected_platforms": connected_total,
        "average_platforms_per_profile": average,
        "profiles": details,
    }))
}
