//! Tool host trait.

use super::{ToolCall, ToolError, ToolSpec};
use serde_json::{Map, Value};
use std::future::Future;

/// Trait for tool execution hosts.
///
/// Implementations provide tool specifications and execute tool calls.
/// This is the boundary between the model loop and side effects.
pub trait ToolHost: Send + Sync {
    /// Get available tool specifications, in the order the host advertised them.
    fn specs(&self) -> &[ToolSpec];

    /// Execute a tool call.
    fn execute(&self, call: &ToolCall) -> impl Future<Output = Result<Value, ToolError>> + Send;
}

/// Tool arguments as sent over MCP: absent, or a JSON object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToolArguments(pub Option<Map<String, Value>>);

impl TryFrom<Value> for ToolArguments {
    type Error = ToolError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Self(None)),
            Value::Object(map) => Ok(Self(Some(map))),
            other => Err(ToolError::InvalidInput(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }
}
