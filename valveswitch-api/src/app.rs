/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use valveswitch_api::{app::AppState, config::Config};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(config);
/// let app = valveswitch_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use valveswitch_shared::{
    auth::{api_key::API_KEY_HEADER, gate::ApiKeyGate, middleware::api_key_gate},
    state::SwitchStore,
};

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Every field is a cheap handle; all clones see the same switch.
#[derive(Clone)]
pub struct AppState {
    /// The single switch value shared by REST and MCP callers
    pub switch: SwitchStore,

    /// Admission gate for the MCP prefix
    pub gate: Arc<ApiKeyGate>,

    /// Application configuration
    pub config: Arc<Config>,

    /// Process start time
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Creates new application state with the switch `OFF`
    pub fn new(config: Config) -> Self {
        Self::with_store(config, SwitchStore::new())
    }

    /// Creates application state around an existing store
    pub fn with_store(config: Config, switch: SwitchStore) -> Self {
        let gate = ApiKeyGate::new(config.mcp.path_prefix.clone(), config.mcp.api_key.clone());

        Self {
            switch,
            gate: Arc::new(gate),
            config: Arc::new(config),
            started_at: Utc::now(),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /                    # Browser UI (public)
/// ├── GET  /static/:asset       # UI assets (public)
/// ├── GET  /health              # Health check (public)
/// ├── /api/                     # REST facade (public)
/// │   ├── GET  /state
/// │   ├── POST /toggle
/// │   └── POST /set/:value
/// └── /mcp                      # MCP Streamable HTTP (API key)
/// ```
///
/// # Middleware Stack
///
/// Applied in order (outermost first):
/// 1. Security headers
/// 2. CORS (tower-http CorsLayer)
/// 3. Logging (tower-http TraceLayer)
/// 4. API key gate (MCP prefix only, before any handler)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let api_routes = Router::new()
        .route("/state", get(routes::rest::get_state))
        .route("/toggle", post(routes::rest::toggle))
        .route("/set/:value", post(routes::rest::set_state));

    let mcp_service = routes::mcp::streamable_http_service(state.switch.clone());

    let cors = cors_layer(&state.config);

    Router::new()
        .route("/", get(routes::ui::index))
        .route("/static/:asset", get(routes::ui::asset))
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .nest_service(&state.config.mcp.path_prefix, mcp_service)
        .fallback(not_found)
        .layer(axum::middleware::from_fn_with_state(
            state.gate.clone(),
            api_key_gate,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// Configures CORS from the allowed-origins list
fn cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.iter().any(|origin| origin == "*") {
        // Development mode: permissive CORS
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static(API_KEY_HEADER),
            header::HeaderName::from_static("mcp-session-id"),
        ])
        .expose_headers([header::HeaderName::from_static("mcp-session-id")])
        .max_age(std::time::Duration::from_secs(3600))
}

async fn not_found() -> ApiError {
    ApiError::NotFound("No such route".to_string())
}
