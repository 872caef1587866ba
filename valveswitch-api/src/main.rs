//! # Valve Switch API Server
//!
//! Serves one valve switch to two kinds of callers:
//! - AI agents over MCP (Streamable HTTP, API key protected)
//! - Browsers over a small REST API plus a polling web page
//!
//! ## Usage
//!
//! ```bash
//! MCP_API_KEY=super-secret-value cargo run -p valveswitch-api
//! ```

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use valveswitch_api::{
    app::{build_router, AppState},
    config::Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "valveswitch_api=debug,valveswitch_shared=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Valve Switch API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;
    tracing::debug!(?config, "Configuration loaded");

    if config.mcp.api_key.is_none() {
        tracing::warn!(
            prefix = %config.mcp.path_prefix,
            "MCP_API_KEY is not set; every MCP request will be rejected"
        );
    }

    let bind_address = config.bind_address();
    let mcp_prefix = config.mcp.path_prefix.clone();

    let state = AppState::new(config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", listener.local_addr()?);
    tracing::info!("MCP endpoint at http://{}{}", listener.local_addr()?, mcp_prefix);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections...");
}
