/// API key credential utilities
///
/// This module extracts the shared-secret credential from a request and
/// compares it against the configured secret.
///
/// # Credential Sources
///
/// Checked in order, first hit wins:
/// 1. `x-api-key` header
/// 2. `key` query-string parameter
///
/// # Security
///
/// - **Comparison**: both values are hashed with SHA-256 and the digests
///   are compared in constant time, so neither content nor length leaks
/// - **Malformed input**: an unreadable header or a query string that
///   fails to parse yields no credential, never an error
///
/// # Example
///
/// ```
/// use axum::http::{HeaderMap, HeaderValue};
/// use valveswitch_shared::auth::api_key::{extract_credential, verify_api_key};
///
/// let mut headers = HeaderMap::new();
/// headers.insert("x-api-key", HeaderValue::from_static("s3cret"));
///
/// let key = extract_credential(&headers, Some("key=ignored")).unwrap();
/// assert_eq!(key, "s3cret");
/// assert!(verify_api_key(&key, "s3cret"));
/// ```

use axum::extract::Query;
use axum::http::{HeaderMap, Uri};
use serde::Deserialize;
use sha2::{Digest, Sha256};

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Query-string parameter carrying the API key
pub const API_KEY_QUERY_PARAM: &str = "key";

#[derive(Debug, Deserialize)]
struct KeyQuery {
    key: Option<String>,
}

/// Extracts the credential from headers, falling back to the query string
///
/// An empty or non-visible-ASCII header value counts as absent.
pub fn extract_credential(headers: &HeaderMap, query: Option<&str>) -> Option<String> {
    header_credential(headers).or_else(|| query.and_then(query_credential))
}

fn header_credential(headers: &HeaderMap) -> Option<String> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Reads the `key` parameter from a raw query string
///
/// Returns `None` when the parameter is missing or when the query string
/// cannot be decoded (e.g. the parameter is repeated).
pub fn query_credential(query: &str) -> Option<String> {
    let uri: Uri = format!("/?{}", query).parse().ok()?;
    let Query(params) = Query::<KeyQuery>::try_from_uri(&uri).ok()?;
    params.key
}

/// Verifies a presented credential against the configured secret
pub fn verify_api_key(presented: &str, secret: &str) -> bool {
    constant_time_compare(&Sha256::digest(presented), &Sha256::digest(secret))
}

/// Constant-time byte comparison
///
/// Always walks the full length of both slices when lengths agree and
/// accumulates differences without short-circuiting.
///
/// # Example
///
/// ```
/// use valveswitch_shared::auth::api_key::constant_time_compare;
///
/// assert!(constant_time_compare(b"hello", b"hello"));
/// assert!(!constant_time_compare(b"hello", b"world"));
/// ```
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }

    result == 0
}
