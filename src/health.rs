//! Liveness HTTP endpoint
//!
//! A single-route server answering `GET /` so the hosting platform can tell
//! the process is alive. Carries no business logic.

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use std::net::SocketAddr;
use tracing::info;

/// Serve the liveness endpoint on `port` until the process exits.
///
/// # Errors
///
/// Returns an error if the port cannot be bound or the server fails.
pub async fn serve(port: u16) -> Result<()> {
    let app = Router::new().route("/", get(|| async { "Home" }));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind liveness listener on {addr}"))?;

    info!("Listening on port {port}...");
    axum::serve(listener, app)
        .await
        .context("liveness server failed")
}
