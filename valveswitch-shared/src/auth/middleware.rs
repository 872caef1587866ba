/// API key admission middleware for Axum
///
/// Wraps [`ApiKeyGate`] as an ordered pipeline stage that runs before any
/// handler sees the request.
///
/// # Streaming Contract
///
/// - The decision uses only the path, headers and query string
/// - On rejection the downstream handler is never invoked
/// - On admission the request is passed through untouched and the
///   downstream response (including a long-lived SSE body) is returned
///   as-is, never buffered or re-emitted
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::post, Router};
/// use std::sync::Arc;
/// use valveswitch_shared::auth::{gate::ApiKeyGate, middleware::api_key_gate};
///
/// let gate = Arc::new(ApiKeyGate::new("/mcp", Some("s3cret".to_string())));
///
/// let app: Router = Router::new()
///     .route("/mcp", post(|| async { "tools" }))
///     .layer(middleware::from_fn_with_state(gate, api_key_gate));
/// ```

use axum::{
    extract::{OriginalUri, Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::gate::{ApiKeyGate, AuthError};

/// Admission middleware guarding the gate's prefix
///
/// Uses the pre-nesting URI when available so the decision does not depend
/// on where the layer is attached.
pub async fn api_key_gate(
    State(gate): State<Arc<ApiKeyGate>>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let uri = req
        .extensions()
        .get::<OriginalUri>()
        .map(|original| &original.0)
        .unwrap_or_else(|| req.uri());

    if let Err(err) = gate.check(uri.path(), req.headers(), uri.query()) {
        tracing::warn!(
            path = %uri.path(),
            method = %req.method(),
            reason = err.reason(),
            "Rejected request to protected path"
        );
        return Err(err);
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, Bytes},
        http::StatusCode,
        middleware,
        routing::{get, post},
        Router,
    };
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::Service as _;

    const SECRET: &str = "test-secret";

    fn app(secret: Option<&str>, hits: Arc<AtomicUsize>) -> Router {
        let gate = Arc::new(ApiKeyGate::new("/mcp", secret.map(str::to_owned)));

        let mcp_hits = hits.clone();
        Router::new()
            .route(
                "/mcp",
                post(move |body: Bytes| {
                    let hits = mcp_hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        body
                    }
                }),
            )
            .route(
                "/mcp/stream",
                get(|| async {
                    let chunks = vec![
                        Ok::<_, Infallible>(Bytes::from_static(b"event: a\n\n")),
                        Ok(Bytes::from_static(b"event: b\n\n")),
                    ];
                    Response::builder()
                        .header("content-type", "text/event-stream")
                        .body(Body::from_stream(futures::stream::iter(chunks)))
                        .unwrap()
                }),
            )
            .route("/open", get(|| async { "open" }))
            .layer(middleware::from_fn_with_state(gate, api_key_gate))
    }

    async fn body_bytes(response: Response) -> Bytes {
        axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap()
    }

    #[tokio::test]
    async fn test_admitted_request_reaches_handler_unmodified() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut app = app(Some(SECRET), hits.clone());

        let payload = r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#;
        let response = app
            .call(
                Request::builder()
                    .method("POST")
                    .uri("/mcp")
                    .header("x-api-key", SECRET)
                    .body(Body::from(payload))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, payload.as_bytes());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_streaming_response_passes_through() {
        let mut app = app(Some(SECRET), Arc::new(AtomicUsize::new(0)));

        let response = app
            .call(
                Request::builder()
                    .uri(format!("/mcp/stream?key={}", SECRET))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("content-type").unwrap(), "text/event-stream");
        assert_eq!(body_bytes(response).await, &b"event: a\n\nevent: b\n\n"[..]);
    }

    #[tokio::test]
    async fn test_rejection_short_circuits() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut app = app(Some(SECRET), hits.clone());

        let response = app
            .call(
                Request::builder()
                    .method("POST")
                    .uri("/mcp")
                    .header("x-api-key", "wrong")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_bytes(response).await,
            "Unauthorized (invalid or missing API key)".as_bytes()
        );
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unconfigured_secret_returns_server_error() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut app = app(None, hits.clone());

        let response = app
            .call(
                Request::builder()
                    .method("POST")
                    .uri("/mcp")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_bytes(response).await,
            "Server not configured: MCP_API_KEY missing".as_bytes()
        );
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unprotected_path_ignores_credentials() {
        let mut app = app(None, Arc::new(AtomicUsize::new(0)));

        let response = app
            .call(
                Request::builder()
                    .uri("/open?key=whatever")
                    .header("x-api-key", "whatever")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, "open".as_bytes());
    }

    #[tokio::test]
    async fn test_concurrent_admissions() {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = app(Some(SECRET), hits.clone());

        let requests = (0..32).map(|i| {
            let mut app = app.clone();
            let key = if i % 2 == 0 { SECRET } else { "wrong" };
            async move {
                app.call(
                    Request::builder()
                        .method("POST")
                        .uri("/mcp")
                        .header("x-api-key", key)
                        .body(Body::from("{}"))
                        .unwrap(),
                )
                .await
                .unwrap()
                .status()
            }
        });

        let statuses = futures::future::join_all(requests).await;
        let ok = statuses.iter().filter(|s| **s == StatusCode::OK).count();
        let unauthorized = statuses.iter().filter(|s| **s == StatusCode::UNAUTHORIZED).count();

        assert_eq!(ok, 16);
        assert_eq!(unauthorized, 16);
        assert_eq!(hits.load(Ordering::SeqCst), 16);
    }
}
