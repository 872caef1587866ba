/// Middleware modules for the API server
///
/// This module contains custom middleware for:
/// - Security headers
///
/// API key admission lives in `valveswitch_shared::auth::middleware`.

pub mod security;
