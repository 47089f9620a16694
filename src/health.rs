//! Health snapshot.
//!
//! Combines static configuration with the live rate-limit counters. Taking a
//! snapshot never counts against the rate limit.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::SERVER_NAME;
use crate::limiter::RateLimitSnapshot;
use crate::session::McpSession;

/// Point-in-time health report, served by `server_health` and `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    /// Always `healthy` while the process can answer
    pub status: &'static str,
    /// When the snapshot was taken
    pub timestamp: DateTime<Utc>,
    /// Server identity
    pub server: ServerInfo,
    /// Configured thresholds and current window counts
    pub rate_limits: RateLimitSnapshot,
    /// Non-secret upstream settings
    pub configuration: ConfigurationInfo,
}

/// Server identity section.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    /// Display name
    pub name: &'static str,
    /// Crate version
    pub version: &'static str,
    /// `stdio` or `http`
    pub transport: String,
    /// Log level in effect
    pub log_level: String,
}

/// Configuration section. Keys are reported only as present/absent.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigurationInfo {
    /// Upstream timeout in seconds
    pub ayrshare_timeout: u64,
    /// Debug mode flag
    pub debug_mode: bool,
    /// Upstream base URL
    pub base_url: String,
    /// Whether a profile key is configured
    pub profile_key_configured: bool,
}

impl HealthReport {
    /// Take a snapshot now.
    pub fn capture(session: &McpSession) -> Self {
        Self::capture_at(session, Utc::now())
    }

    /// Take a snapshot as of `now`.
    pub fn capture_at(session: &McpSession, now: DateTime<Utc>) -> Self {
        let config = session.config();
        Self {
            status: "healthy",
            timestamp: now,
            server: ServerInfo {
                name: SERVER_NAME,
                version: env!("CARGO_PKG_VERSION"),
                transport: config.transport.to_string(),
                log_level: config.effective_log_level().to_string(),
            },
            rate_limits: session.limiter().snapshot_at(now),
            configuration: ConfigurationInfo {
                ayrshare_timeout: config.timeout_secs,
                debug_mode: config.debug,
                base_url: config.base_url.clone(),
                profile_key_configured: config.profile_key().is_some(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::TimeZone;
    use serde_json::{json, Value as JsonValue};

    use crate::client::{Upstream, UpstreamRequest};
    use crate::config::Config;
    use crate::error::Result;
    use crate::limiter::RateLimiter;

    struct Unreachable;

    #[async_trait]
    impl Upstream for Unreachable {
        async fn call(&self, _request: UpstreamRequest) -> Result<JsonValue> {
            panic!("health must not call upstream");
        }
    }

    #[test]
    fn report_shape_and_counters() {
        let now = Utc.with_ymd_and_hms(2024, 12, 1, 10, 0, 30).unwrap();
        let limiter = Arc::new(RateLimiter::new(60, 1000));
        limiter.try_acquire_at(now).unwrap();
        let mut config = Config::with_api_key("secret-key");
        config.profile_key = Some("profile-secret".into());
        let session = McpSession::new(config, Arc::new(Unreachable), limiter);

        let report = serde_json::to_value(HealthReport::capture_at(&session, now)).unwrap();
        assert_eq!(report["status"], "healthy");
        assert_eq!(report["server"]["name"], SERVER_NAME);
        assert_eq!(report["server"]["transport"], "stdio");
        assert_eq!(
            report["rate_limits"],
            json!({"per_minute": 60, "per_hour": 1000, "current_minute": 1, "current_hour": 1})
        );
        assert_eq!(report["configuration"]["ayrshare_timeout"], 30);
        assert_eq!(report["configuration"]["profile_key_configured"], true);

        let text = report.to_string();
        assert!(!text.contains("secret-key"));
        assert!(!text.contains("profile-secret"));
    }

    #[test]
    fn capture_does_not_count() {
        let session = McpSession::new(
            Config::with_api_key("k"),
            Arc::new(Unreachable),
            Arc::new(RateLimiter::new(1, 0)),
        );
        for _ in 0..3 {
            HealthReport::capture(&session);
        }
        assert!(session.admit().is_ok());
    }
}
