//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - Test configuration with an optional MCP secret
//! - App construction around an inspectable switch store
//! - Request helpers that drive the router without a socket

#![allow(dead_code)]

use axum::{
    body::{Body, Bytes},
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use futures::StreamExt;
use serde_json::{json, Value};
use std::time::Duration;
use tower::Service as _;
use valveswitch_api::app::{build_router, AppState};
use valveswitch_api::config::{ApiConfig, Config, McpConfig};
use valveswitch_shared::state::SwitchStore;

/// Secret used by tests that configure one
pub const TEST_API_KEY: &str = "test-mcp-key-0123456789";

/// Test context containing the router and the store behind it
pub struct TestContext {
    pub app: Router,
    pub store: SwitchStore,
    pub config: Config,
}

impl TestContext {
    /// Creates a context with [`TEST_API_KEY`] configured
    pub fn new() -> Self {
        Self::with_api_key(Some(TEST_API_KEY))
    }

    /// Creates a context with the given secret (or none)
    pub fn with_api_key(api_key: Option<&str>) -> Self {
        let config = test_config(api_key);
        let store = SwitchStore::new();
        let state = AppState::with_store(config.clone(), store.clone());

        Self {
            app: build_router(state),
            store,
            config,
        }
    }

    /// Sends a request and returns status and full body
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Bytes) {
        send(self.app.clone(), request).await
    }

    /// Sends a request and returns only the status, leaving the body unread
    pub async fn status_of(&self, request: Request<Body>) -> StatusCode {
        self.app.clone().call(request).await.unwrap().status()
    }

    /// Sends a request and parses the JSON body
    pub async fn send_json(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        send_json(self.app.clone(), request).await
    }
}

/// Drives an owned router clone, so the future can move into a spawned task
pub async fn send(mut app: Router, request: Request<Body>) -> (StatusCode, Bytes) {
    let response = app.call(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body)
}

/// Like [`send`], parsing the body as JSON
pub async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

/// Builds a configuration suitable for tests
pub fn test_config(api_key: Option<&str>) -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            production: false,
        },
        mcp: McpConfig {
            api_key: api_key.map(str::to_owned),
            path_prefix: "/mcp".to_string(),
        },
    }
}

/// `GET` with empty body
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// `POST` with empty body
pub fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// MCP `initialize` request, optionally carrying an `x-api-key` header
pub fn mcp_initialize(uri: &str, api_key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("accept", "application/json, text/event-stream");

    if let Some(key) = api_key {
        builder = builder.header("x-api-key", key);
    }

    let payload = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {
            "protocolVersion": "2025-03-26",
            "capabilities": {},
            "clientInfo": { "name": "integration-test", "version": "1.0" }
        }
    });

    builder.body(Body::from(payload.to_string())).unwrap()
}

/// True when the gate admitted the request and the MCP service accepted it
pub fn admitted(status: StatusCode) -> bool {
    status == StatusCode::OK
}

/// Session header set by the MCP service on `initialize`
pub const MCP_SESSION_HEADER: &str = "mcp-session-id";

/// JSON-RPC `POST` to the MCP endpoint inside an existing session
pub fn mcp_post(session_id: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/mcp")
        .header("content-type", "application/json")
        .header("accept", "application/json, text/event-stream")
        .header("x-api-key", TEST_API_KEY)
        .header(MCP_SESSION_HEADER, session_id)
        .body(Body::from(payload.to_string()))
        .unwrap()
}

/// Reads SSE frames until the JSON-RPC message answering `id` arrives
///
/// The stream may stay open after the answer, so the body is consumed
/// incrementally rather than collected.
pub async fn read_sse_reply(response: Response, id: u64) -> Value {
    let mut stream = response.into_body().into_data_stream();
    let mut buffer = String::new();

    let reply = async {
        while let Some(chunk) = stream.next().await {
            buffer.push_str(&String::from_utf8_lossy(&chunk.unwrap()));

            for line in buffer.lines() {
                let Some(data) = line.strip_prefix("data:") else {
                    continue;
                };
                let Ok(message) = serde_json::from_str::<Value>(data.trim()) else {
                    continue;
                };
                if message["id"] == id {
                    return message;
                }
            }
        }
        panic!("SSE stream ended without a reply to id {}: {}", id, buffer);
    };

    tokio::time::timeout(Duration::from_secs(5), reply)
        .await
        .expect("timed out waiting for SSE reply")
}

/// An initialized MCP session driven through the full router
pub struct McpSession {
    app: Router,
    pub session_id: String,
    pub server_info: Value,
    next_id: u64,
}

impl McpSession {
    /// Runs `initialize` and `notifications/initialized` with [`TEST_API_KEY`]
    pub async fn open(mut app: Router) -> Self {
        let response = app
            .call(mcp_initialize("/mcp", Some(TEST_API_KEY)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let session_id = response
            .headers()
            .get(MCP_SESSION_HEADER)
            .expect("initialize must assign a session")
            .to_str()
            .unwrap()
            .to_owned();

        let init = read_sse_reply(response, 1).await;
        let server_info = init["result"]["serverInfo"].clone();

        let notification = json!({ "jsonrpc": "2.0", "method": "notifications/initialized" });
        let response = app.call(mcp_post(&session_id, notification)).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        Self {
            app,
            session_id,
            server_info,
            next_id: 2,
        }
    }

    /// Sends one JSON-RPC request and returns the full reply message
    pub async fn request(&mut self, method: &str, params: Value) -> Value {
        let id = self.next_id;
        self.next_id += 1;

        let payload = json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params });
        let response = self
            .app
            .call(mcp_post(&self.session_id, payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        read_sse_reply(response, id).await
    }

    /// Calls a tool; `Ok` holds the decoded text content, `Err` the JSON-RPC error
    pub async fn call_tool(&mut self, name: &str, arguments: Value) -> Result<Value, Value> {
        let reply = self
            .request("tools/call", json!({ "name": name, "arguments": arguments }))
            .await;

        if !reply["error"].is_null() {
            return Err(reply["error"].clone());
        }

        let content = &reply["result"]["content"];
        assert_eq!(content.as_array().map(Vec::len), Some(1));
        assert_eq!(content[0]["type"], "text");
        Ok(serde_json::from_str(content[0]["text"].as_str().unwrap()).unwrap())
    }
}
