//! Process configuration.
//!
//! Every setting can be passed as a flag or through the environment, which is
//! how MCP hosts usually configure stdio servers.

use std::fmt;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::error::{McpError, Result};

/// Default upstream API root.
pub const DEFAULT_BASE_URL: &str = "https://app.ayrshare.com/api";

/// Server name reported in `initialize` and health checks.
pub const SERVER_NAME: &str = "Ayrshare MCP Server";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// One JSON object per line
    Json,
    /// Human-readable lines
    Text,
}

/// How the server is exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransportMode {
    /// JSON-RPC over stdin/stdout
    Stdio,
    /// JSON-RPC over HTTP, plus a health endpoint
    Http,
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportMode::Stdio => write!(f, "stdio"),
            TransportMode::Http => write!(f, "http"),
        }
    }
}

/// Server configuration, loaded once at startup.
#[derive(Clone, Parser)]
#[command(name = "ayrshare-mcp")]
#[command(version, about = "MCP server for the Ayrshare social media API", long_about = None)]
pub struct Config {
    /// Ayrshare API key
    #[arg(long, env = "AYRSHARE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Profile key for multi-tenant (sub-account) calls
    #[arg(long, env = "AYRSHARE_PROFILE_KEY", hide_env_values = true)]
    pub profile_key: Option<String>,

    /// Upstream API root
    #[arg(long, env = "AYRSHARE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Upstream request timeout in seconds
    #[arg(long = "timeout", env = "AYRSHARE_TIMEOUT", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Debug mode; raises the log level to `debug` unless `trace` is set
    #[arg(long, env = "AYRSHARE_DEBUG", default_value_t = false)]
    pub debug: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log format
    #[arg(long, env = "LOG_FORMAT", value_enum, ignore_case = true, default_value = "json")]
    pub log_format: LogFormat,

    /// Maximum tool calls per minute (0 disables)
    #[arg(long, env = "RATE_LIMIT_PER_MINUTE", default_value_t = 60)]
    pub rate_limit_per_minute: u32,

    /// Maximum tool calls per hour (0 disables)
    #[arg(long, env = "RATE_LIMIT_PER_HOUR", default_value_t = 1000)]
    pub rate_limit_per_hour: u32,

    /// Transport mode
    #[arg(long, env = "TRANSPORT", value_enum, ignore_case = true, default_value = "stdio")]
    pub transport: TransportMode,

    /// Bind host for the HTTP transport
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Bind port for the HTTP transport
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,
}

impl Config {
    /// Configuration with defaults and the given API key, without reading
    /// flags or the environment.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            profile_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            debug: false,
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
            rate_limit_per_minute: 60,
            rate_limit_per_hour: 1000,
            transport: TransportMode::Stdio,
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }

    /// Reject configurations the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.api_key().is_none() {
            return Err(McpError::Configuration(
                "API key required. Set the AYRSHARE_API_KEY environment variable or pass --api-key."
                    .to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(McpError::Configuration(
                "AYRSHARE_TIMEOUT must be at least 1 second".to_string(),
            ));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(McpError::Configuration(format!(
                "AYRSHARE_BASE_URL must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        Ok(())
    }

    /// The API key, if set and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// The profile key, if set and non-blank.
    pub fn profile_key(&self) -> Option<&str> {
        self.profile_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Log level after applying debug mode.
    pub fn effective_log_level(&self) -> &str {
        if self.debug && !self.log_level.eq_ignore_ascii_case("trace") {
            "debug"
        } else {
            &self.log_level
        }
    }

    /// Upstream request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Address the HTTP transport binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Values that must never appear in logs or error messages.
    pub fn secrets(&self) -> Vec<String> {
        self.api_key()
            .into_iter()
            .chain(self.profile_key())
            .map(str::to_string)
            .collect()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |key: Option<&str>| key.map(|_| "***");
        f.debug_struct("Config")
            .field("api_key", &mask(self.api_key()))
            .field("profile_key", &mask(self.profile_key()))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("debug", &self.debug)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("rate_limit_per_hour", &self.rate_limit_per_hour)
            .field("transport", &self.transport)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_is_a_configuration_error() {
        let mut config = Config::with_api_key("   ");
        assert!(matches!(config.validate(), Err(McpError::Configuration(_))));

        config.api_key = None;
        assert!(matches!(config.validate(), Err(McpError::Configuration(_))));

        config.api_key = Some("key".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = Config::with_api_key("key");
        config.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_mode_raises_log_level() {
        let mut config = Config::with_api_key("key");
        assert_eq!(config.effective_log_level(), "info");
        config.debug = true;
        assert_eq!(config.effective_log_level(), "debug");
        config.log_level = "trace".into();
        assert_eq!(config.effective_log_level(), "trace");
    }

    #[test]
    fn debug_output_masks_keys() {
        let mut config = Config::with_api_key("super-secret-key");
        config.profile_key = Some("profile-secret".into());
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret-key"));
        assert!(!rendered.contains("profile-secret"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn parses_flags() {
        let config = Config::try_parse_from([
            "ayrshare-mcp",
            "--api-key",
            "k",
            "--transport",
            "http",
            "--port",
            "9000",
            "--rate-limit-per-minute",
            "2",
            "--log-format",
            "text",
        ])
        .unwrap();
        assert_eq!(config.api_key(), Some("k"));
        assert_eq!(config.transport, TransportMode::Http);
        assert_eq!(config.port, 9000);
        assert_eq!(config.rate_limit_per_minute, 2);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn secrets_lists_configured_keys() {
        let mut config = Config::with_api_key("a");
        assert_eq!(config.secrets(), vec!["a".to_string()]);
        config.profile_key = Some("b".into());
        assert_eq!(config.secrets(), vec!["a".to_string(), "b".to_string()]);
    }
}
