/// Authentication for the MCP endpoint
///
/// This module provides the single shared-secret admission gate that
/// guards the tool-invocation prefix:
///
/// # Modules
///
/// - [`api_key`]: credential extraction and constant-time verification
/// - [`gate`]: prefix predicate and admit/reject decision
/// - [`middleware`]: Axum middleware stage wrapping the gate
///
/// # Security Features
///
/// - **Fail closed**: no configured secret rejects every protected request
/// - **Constant-time comparison**: SHA-256 digests compared without
///   short-circuiting
/// - **Stateless**: the gate holds no locks and no mutable state
///
/// # Example
///
/// ```
/// use axum::http::HeaderMap;
/// use valveswitch_shared::auth::gate::{is_protected_path, ApiKeyGate};
///
/// assert!(is_protected_path("/mcp/session", "/mcp"));
///
/// let gate = ApiKeyGate::new("/mcp", None);
/// assert!(gate.check("/mcp", &HeaderMap::new(), None).is_err());
/// ```

pub mod api_key;
pub mod gate;
pub mod middleware;
