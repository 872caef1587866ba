//! # Valve Switch API Server Library
//!
//! This library provides the core functionality for the valve switch API server.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Response-header middleware
//! - `routes`: REST, MCP, UI and health handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
