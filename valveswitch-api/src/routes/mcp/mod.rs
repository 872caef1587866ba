/// MCP (Model Context Protocol) tool endpoint
///
/// This module lets AI agents read and drive the valve switch through the
/// MCP Streamable HTTP transport.
///
/// # Tools
///
/// - `status` - Current switch position
/// - `toggle` - Flip the switch
/// - `set` - Force the switch to `ON` or `OFF`
///
/// # Authentication
///
/// The whole prefix is guarded by the API key gate:
/// - Header: `X-Api-Key: <key>`
/// - Query (fallback): `?key=<key>`
///
/// # Example Usage
///
/// ```text
/// // Initialize a session
/// POST /mcp
/// X-Api-Key: <key>
/// Accept: application/json, text/event-stream
/// {"jsonrpc":"2.0","id":1,"method":"initialize","params":{...}}
///
/// // Toggle the valve
/// POST /mcp
/// Mcp-Session-Id: <session>
/// {"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"toggle"}}
/// → {"status": "ON", "switch": true}
/// ```

pub mod server;
pub mod tools;

// Re-export for convenience
pub use server::{streamable_http_service, ValveMcpServer};
pub use tools::{ToolCall, ToolCallError, ToolOutput, ValveTools};
