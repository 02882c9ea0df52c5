//! MCP (Model Context Protocol) client over a child process.
//!
//! The server is spawned with its stdin/stdout wired to the rmcp stdio
//! transport; its stderr is inherited so diagnostics reach the terminal.
//! Dropping the client terminates the child.
//!
//! # Example
//!
//! ```ignore
//! use runtime::tools::McpClient;
//!
//! # async fn example() -> Result<(), runtime::tools::McpError> {
//! let client = McpClient::spawn("python", ["weather.py"]).await?;
//!
//! for tool in client.list_tools().await? {
//!     println!("Tool: {}", tool.name);
//! }
//! # Ok(())
//! # }
//! ```

use rmcp::{
    ServiceExt,
    model::CallToolRequestParams,
    service::{RoleClient, RunningService},
    transport::{ConfigureCommandExt, IntoTransport, TokioChildProcess},
};
use serde_json::{Map, Value};
use tokio::process::Command;
use tracing::{debug, info};

pub use rmcp::model::{CallToolResult, Tool};

/// Error type for MCP operations.
pub type McpError = Box<dyn std::error::Error + Send + Sync>;

/// An MCP client connected to a server process.
pub struct McpClient {
    program: String,
    service: RunningService<RoleClient, ()>,
}

impl McpClient {
    /// Spawn an MCP server and complete the protocol handshake.
    ///
    /// # Arguments
    ///
    /// * `program` - The executable to run (e.g., "python")
    /// * `args` - Arguments to pass to it
    pub async fn spawn(
        program: impl AsRef<str>,
        args: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Result<Self, McpError> {
        let program = program.as_ref().to_string();
        let args: Vec<String> = args.into_iter().map(|a| a.as_ref().to_string()).collect();
        debug!(%program, ?args, "spawning MCP server");

        let transport = TokioChildProcess::new(Command::new(&program).configure(|cmd| {
            cmd.args(&args);
        }))?;

        Self::connect(program, transport).await
    }

    /// Complete the protocol handshake over an already open transport.
    ///
    /// `name` identifies the server in logs.
    pub async fn connect<T, E, A>(name: impl Into<String>, transport: T) -> Result<Self, McpError>
    where
        T: IntoTransport<RoleClient, E, A>,
        E: std::error::Error + Send + Sync + 'static,
    {
        let program = name.into();
        let service = ().serve(transport).await?;
        info!(%program, "MCP server connected");

        Ok(Self { program, service })
    }

    /// List available tools from the server, in the order it reports them.
    pub async fn list_tools(&self) -> Result<Vec<Tool>, McpError> {
        let response = self.service.list_tools(Default::default()).await?;
        debug!(count = response.tools.len(), "listed MCP tools");
        Ok(response.tools)
    }

    /// Call a tool with the given name and arguments.
    pub async fn call_tool(
        &self,
        name: impl Into<String>,
        arguments: Option<Map<String, Value>>,
    ) -> Result<CallToolResult, McpError> {
        let name = name.into();
        debug!(tool = %name, "calling MCP tool");

        let params = CallToolRequestParams {
            name: name.into(),
            arguments,
            meta: None,
            task: None,
        };

        let result = self.service.call_tool(params).await?;
        Ok(result)
    }

    /// Close the session and terminate the server process.
    pub async fn shutdown(self) -> Result<(), McpError> {
        let reason = self.service.cancel().await?;
        debug!(program = %self.program, ?reason, "MCP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn spawn_of_missing_program_fails() {
        let result = McpClient::spawn("quickstart-no-such-server", ["weather.py"]).await;
        assert!(result.is_err());
    }
}
