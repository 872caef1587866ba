/// Valve switch MCP tools
///
/// Thin synchronous wrappers over the shared switch store. They add no
/// locking of their own: every call is exactly one store operation.
///
/// # Tools
///
/// | Name     | Arguments                  | Effect            |
/// |----------|----------------------------|-------------------|
/// | `status` | none                       | read only         |
/// | `toggle` | none                       | flip              |
/// | `set`    | `{"status": "ON" \| "OFF"}` | force to `status` |
///
/// All three return `{"status": "ON" | "OFF", "switch": bool}`.

use rmcp::model::{JsonObject, Tool};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;
use valveswitch_shared::state::{SwitchStatus, SwitchStore};

/// Tool name: read the switch
pub const STATUS_TOOL: &str = "status";

/// Tool name: flip the switch
pub const TOGGLE_TOOL: &str = "toggle";

/// Tool name: force the switch
pub const SET_TOOL: &str = "set";

/// Result shape shared by every tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    /// `"ON"` or `"OFF"`
    pub status: SwitchStatus,

    /// Same value as a boolean
    #[serde(rename = "switch")]
    pub on: bool,
}

impl From<bool> for ToolOutput {
    fn from(on: bool) -> Self {
        Self {
            status: on.into(),
            on,
        }
    }
}

/// Arguments of the `set` tool
#[derive(Debug, Clone, Deserialize)]
pub struct SetArgs {
    /// Desired position
    pub status: SwitchStatus,
}

/// A parsed tool invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolCall {
    Status,
    Toggle,
    Set(SwitchStatus),
}

/// Errors from resolving a tool invocation
#[derive(Debug, Error)]
pub enum ToolCallError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for '{tool}': {reason}")]
    InvalidArguments { tool: &'static str, reason: String },
}

impl ToolCall {
    /// Resolves a tool name and its raw arguments
    pub fn parse(name: &str, arguments: Option<JsonObject>) -> Result<Self, ToolCallError> {
        match name {
            STATUS_TOOL => Ok(ToolCall::Status),
            TOGGLE_TOOL => Ok(ToolCall::Toggle),
            SET_TOOL => {
                let args = Value::Object(arguments.unwrap_or_default());
                let SetArgs { status } =
                    serde_json::from_value(args).map_err(|e| ToolCallError::InvalidArguments {
                        tool: SET_TOOL,
                        reason: e.to_string(),
                    })?;
                Ok(ToolCall::Set(status))
            }
            other => Err(ToolCallError::UnknownTool(other.to_string())),
        }
    }
}

/// Tool implementations bound to a switch store
#[derive(Debug, Clone)]
pub struct ValveTools {
    store: SwitchStore,
}

impl ValveTools {
    pub fn new(store: SwitchStore) -> Self {
        Self { store }
    }

    /// Current switch status
    pub fn status(&self) -> ToolOutput {
        self.store.get().into()
    }

    /// Flips the switch
    pub fn toggle(&self) -> ToolOutput {
        self.store.toggle().into()
    }

    /// Forces the switch to `desired`
    pub fn set(&self, desired: SwitchStatus) -> ToolOutput {
        self.store.set(desired.is_on()).into()
    }

    /// Runs a parsed invocation
    pub fn invoke(&self, call: ToolCall) -> ToolOutput {
        match call {
            ToolCall::Status => self.status(),
            ToolCall::Toggle => self.toggle(),
            ToolCall::Set(desired) => self.set(desired),
        }
    }
}

fn object_schema(schema: Value) -> Arc<JsonObject> {
    match schema {
        Value::Object(map) => Arc::new(map),
        _ => Arc::new(JsonObject::new()),
    }
}

/// Tool descriptors advertised by `tools/list`
pub fn tool_definitions() -> Vec<Tool> {
    let no_args = json!({ "type": "object", "properties": {} });

    vec![
        Tool::new(
            STATUS_TOOL,
            "Get current valve switch status.",
            object_schema(no_args.clone()),
        ),
        Tool::new(
            TOGGLE_TOOL,
            "Toggle valve switch state.",
            object_schema(no_args),
        ),
        Tool::new(
            SET_TOOL,
            "Set valve switch explicitly to ON or OFF.",
            object_schema(json!({
                "type": "object",
                "properties": {
                    "status": {
                        "type": "string",
                        "enum": ["ON", "OFF"],
                        "description": "Desired switch position"
                    }
                },
                "required": ["status"]
            })),
        ),
    ]
}
