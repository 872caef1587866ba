/// Admission decision for the protected MCP prefix
///
/// [`ApiKeyGate`] decides, from the request path, headers and query string
/// alone, whether a request may proceed. It never looks at a body and holds
/// no mutable state, so a single instance can be shared across every
/// connection without becoming a serialization point.
///
/// # Decision Table
///
/// | Path protected | Secret configured | Credential        | Outcome              |
/// |----------------|-------------------|-------------------|----------------------|
/// | no             | any               | any               | admit                |
/// | yes            | no                | any               | `NotConfigured` (500)|
/// | yes            | yes               | missing           | `MissingCredentials` (401) |
/// | yes            | yes               | mismatched        | `InvalidApiKey` (401)|
/// | yes            | yes               | exact match       | admit                |
///
/// # Example
///
/// ```
/// use axum::http::HeaderMap;
/// use valveswitch_shared::auth::gate::{ApiKeyGate, AuthError};
///
/// let gate = ApiKeyGate::new("/mcp", Some("s3cret".to_string()));
///
/// assert!(gate.check("/api/state", &HeaderMap::new(), None).is_ok());
/// assert!(gate.check("/mcp", &HeaderMap::new(), Some("key=s3cret")).is_ok());
/// assert!(matches!(
///     gate.check("/mcp", &HeaderMap::new(), Some("key=nope")),
///     Err(AuthError::InvalidApiKey)
/// ));
/// ```

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use super::api_key::{extract_credential, verify_api_key};

/// Default protected prefix (the MCP mount point)
pub const DEFAULT_PROTECTED_PREFIX: &str = "/mcp";

/// Rejection reasons produced by the gate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No server-side secret is configured
    #[error("Server not configured: MCP_API_KEY missing")]
    NotConfigured,

    /// No credential in header or query string
    #[error("Unauthorized (invalid or missing API key)")]
    MissingCredentials,

    /// Credential present but does not match
    #[error("Unauthorized (invalid or missing API key)")]
    InvalidApiKey,
}

impl AuthError {
    /// HTTP status for this rejection
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::MissingCredentials | AuthError::InvalidApiKey => StatusCode::UNAUTHORIZED,
        }
    }

    /// Short machine-readable reason, used in logs
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::NotConfigured => "not_configured",
            AuthError::MissingCredentials => "missing_credentials",
            AuthError::InvalidApiKey => "invalid_api_key",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}

/// Returns true when `path` falls under `prefix`
///
/// Matching respects segment boundaries: with prefix `/mcp`, the paths
/// `/mcp`, `/mcp/` and `/mcp/sessions` are protected while `/mcpx` is not.
/// A trailing slash on the prefix is ignored.
pub fn is_protected_path(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return true;
    }

    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Stateless shared-secret gate for one path prefix
#[derive(Clone)]
pub struct ApiKeyGate {
    prefix: String,
    secret: Option<String>,
}

impl ApiKeyGate {
    /// Creates a gate guarding `prefix`
    ///
    /// An empty secret is treated the same as no secret.
    pub fn new(prefix: impl Into<String>, secret: Option<String>) -> Self {
        Self {
            prefix: prefix.into(),
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    /// Protected prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether a secret is configured
    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    /// Decides whether a request may proceed
    ///
    /// `query` is the raw query string without the leading `?`.
    pub fn check(&self, path: &str, headers: &HeaderMap, query: Option<&str>) -> Result<(), AuthError> {
        if !is_protected_path(path, &self.prefix) {
            return Ok(());
        }

        let secret = self.secret.as_deref().ok_or(AuthError::NotConfigured)?;

        let presented = extract_credential(headers, query).ok_or(AuthError::MissingCredentials)?;

        if verify_api_key(&presented, secret) {
            Ok(())
        } else {
            Err(AuthError::InvalidApiKey)
        }
    }
}

// Keep the secret out of debug output.
impl std::fmt::Debug for ApiKeyGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyGate")
            .field("prefix", &self.prefix)
            .field("configured", &self.is_configured())
            .finish()
    }
}
