//! Network-exposed transport.
//!
//! `POST /mcp` takes one JSON-RPC message and answers with its response, or
//! `202 Accepted` for a notification. `GET /health` returns the health
//! snapshot.

use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::error::Result;
use crate::health::HealthReport;
use crate::server::McpServer;

/// Build the router.
pub fn router(server: Arc<McpServer>) -> Router {
    Router::new()
        .route("/mcp", post(mcp_handler))
        .route("/health", get(health_handler))
        .with_state(server)
}

async fn mcp_handler(State(server): State<Arc<McpServer>>, body: String) -> Response {
    match server.handle_message(&body).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

async fn health_handler(State(server): State<Arc<McpServer>>) -> Json<HealthReport> {
    Json(HealthReport::capture(server.session()))
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn run_http(server: Arc<McpServer>, addr: &str) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve(server, listener, shutdown_signal()).await
}

/// Serve on an already-bound listener until `shutdown` resolves.
pub async fn serve<F>(server: Arc<McpServer>, listener: TcpListener, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!(addr = %listener.local_addr()?, "Starting MCP HTTP transport");
    axum::serve(listener, router(server))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("HTTP transport stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
