/// API route handlers
///
/// This module contains all route handlers organized by caller:
///
/// - `health`: Health check endpoint
/// - `rest`: REST facade for browsers (`/api/...`)
/// - `mcp`: MCP tools for agents (Streamable HTTP)
/// - `ui`: Static browser page and assets

pub mod health;
pub mod mcp;
pub mod rest;
pub mod ui;
