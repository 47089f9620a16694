//! Ayrshare MCP server binary.
//!
//! Configuration comes from flags or the environment; logs go to stderr so
//! stdout stays free for the stdio protocol channel.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ayrshare_mcp::{Config, LogFormat, McpServer, McpSession, TransportMode};

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.effective_log_level()))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match config.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.compact().with_ansi(false).init(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();
    init_tracing(&config);

    if let Err(e) = config.validate() {
        error!(error = %e, "Refusing to start");
        return ExitCode::FAILURE;
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        transport = %config.transport,
        base_url = %config.base_url,
        timeout_secs = config.timeout_secs,
        rate_limit_per_minute = config.rate_limit_per_minute,
        rate_limit_per_hour = config.rate_limit_per_hour,
        profile_key = config.profile_key().is_some(),
        debug = config.debug,
        "Starting Ayrshare MCP server"
    );

    let session = match McpSession::from_config(config.clone()) {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "Failed to initialize session");
            return ExitCode::FAILURE;
        }
    };
    let server = Arc::new(McpServer::new(session));

    let outcome = match config.transport {
        TransportMode::Stdio => server.run_stdio().await,
        TransportMode::Http => ayrshare_mcp::http::run_http(server, &config.bind_addr()).await,
    };

    match outcome {
        Ok(()) => {
            info!("Server stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Server error");
            ExitCode::FAILURE
        }
    }
}
