//! # Valve Switch Shared Library
//!
//! This crate contains the state and authentication building blocks used
//! by the valve switch API server.
//!
//! ## Module Organization
//!
//! - `state`: the process-wide switch value and its serialized operations
//! - `auth`: API key admission gate for the MCP endpoint

pub mod auth;
pub mod state;

/// Current version of the valve switch shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
