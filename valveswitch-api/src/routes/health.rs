/// Health check endpoint
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "started_at": "2025-01-04T12:00:00Z",
///   "mcp_configured": true
/// }
/// ```

use crate::app::AppState;
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// When the process started
    pub started_at: DateTime<Utc>,

    /// Whether an MCP API key is configured
    pub mcp_configured: bool,
}

/// Health check handler
///
/// Public and unauthenticated. Does not touch the switch state.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        started_at: state.started_at,
        mcp_configured: state.gate.is_configured(),
    })
}
