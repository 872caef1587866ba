//! rmcp server handler exposing the valve tools over Streamable HTTP

use rmcp::{
    model::*,
    service::{RequestContext, RoleServer},
    transport::streamable_http_server::{
        session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
    },
    ErrorData as McpError, ServerHandler,
};
use valveswitch_shared::state::SwitchStore;

use super::tools::{tool_definitions, ToolCall, ToolCallError, ToolOutput, ValveTools};

/// Name advertised in the MCP `initialize` handshake
pub const SERVER_NAME: &str = "valve-switch-http";

/// MCP handler backed by the shared switch store
#[derive(Clone)]
pub struct ValveMcpServer {
    tools: ValveTools,
}

impl ValveMcpServer {
    pub fn new(store: SwitchStore) -> Self {
        Self {
            tools: ValveTools::new(store),
        }
    }

    /// Resolves and runs one tool call without the transport
    pub fn dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<ToolOutput, ToolCallError> {
        let call = ToolCall::parse(name, arguments)?;
        Ok(self.tools.invoke(call))
    }
}

fn to_mcp_error(err: ToolCallError) -> McpError {
    McpError::invalid_params(err.to_string(), None)
}

impl ServerHandler for ValveMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(
                "Valve switch controller. Use `status` to read the valve, `toggle` to flip it \
                 and `set` with status ON or OFF to force it."
                    .into(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _ctx: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: tool_definitions(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _ctx: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let output = self
            .dispatch(&request.name, request.arguments)
            .map_err(|e| {
                tracing::warn!(tool = %request.name, error = %e, "Rejected tool call");
                to_mcp_error(e)
            })?;

        tracing::info!(tool = %request.name, switch = output.on, "Tool call completed");

        let body = serde_json::to_string(&output)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        Ok(CallToolResult::success(vec![Content::text(body)]))
    }
}

/// Builds the Streamable HTTP service to nest under the MCP prefix
pub fn streamable_http_service(
    store: SwitchStore,
) -> StreamableHttpService<ValveMcpServer, LocalSessionManager> {
    let server = ValveMcpServer::new(store);

    StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    )
}
