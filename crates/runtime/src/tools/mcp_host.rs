//! MCP-backed tool host.

use super::{McpClient, McpError, Tool, ToolArguments, ToolCall, ToolError, ToolHost, ToolSpec};
use serde_json::Value;
use tracing::warn;

impl From<Tool> for ToolSpec {
    fn from(tool: Tool) -> Self {
        Self {
            name: tool.name.to_string(),
            description: tool
                .description
                .map(|description| description.to_string())
                .unwrap_or_default(),
            schema: Value::Object(tool.input_schema.as_ref().clone()),
        }
    }
}

/// Tool host backed by an MCP server.
pub struct McpToolHost {
    client: McpClient,
    specs: Vec<ToolSpec>,
}

impl McpToolHost {
    /// Fetch the server's tool catalog and cache it as tool specs.
    pub async fn connect(client: McpClient) -> Result<Self, McpError> {
        let specs = client
            .list_tools()
            .await?
            .into_iter()
            .map(ToolSpec::from)
            .collect();
        Ok(Self { client, specs })
    }

    /// Spawn an MCP server and cache its tool specs.
    pub async fn spawn(
        program: impl AsRef<str>,
        args: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Result<Self, McpError> {
        let client = McpClient::spawn(program, args).await?;
        Self::connect(client).await
    }

    /// Shut down the underlying server.
    pub async fn shutdown(self) -> Result<(), McpError> {
        self.client.shutdown().await
    }
}

impl ToolHost for McpToolHost {
    fn specs(&self) -> &[ToolSpec] {
        &self.specs
    }

    async fn execute(&self, call: &ToolCall) -> Result<Value, ToolError> {
        if !self.specs.iter().any(|spec| spec.name == call.name) {
            return Err(ToolError::NotFound(call.name.clone()));
        }

        let arguments = ToolArguments::try_from(call.input.clone())?;
        let result = self
            .client
            .call_tool(&call.name, arguments.0)
            .await
            .map_err(|e| ToolError::Execution(e.to_string()))?;

        let content = serde_json::to_value(&result.content)
            .map_err(|e| ToolError::Execution(format!("serialize result: {e}")))?;

        if result.is_error.unwrap_or(false) {
            let message = content_text(&content);
            warn!(tool = %call.name, %message, "MCP tool reported an error");
            return Err(ToolError::Execution(message));
        }

        Ok(content)
    }
}

/// Join the text blocks of serialized MCP content.
fn content_text(content: &Value) -> String {
    content
        .as_array()
        .map(|blocks| {
            blocks
                .iter()
                .filter_map(|block| block.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}
