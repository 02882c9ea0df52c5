//! Runtime for the quickstart MCP chat client.
//!
//! This crate connects three pieces: an MCP server reached over a child
//! process, the Anthropic Messages API streamed over server-sent events,
//! and a chat client that lets the model call the server's tools while
//! its answer streams.
//!
//! # Overview
//!
//! - **McpClient / McpToolHost**: spawn an MCP server and expose its tools.
//! - **Backend**: a trait abstracting streamed model turns; `AnthropicBackend`
//!   implements it.
//! - **ChatClient**: streams a query's answer and resolves tool calls
//!   through a `ToolHost`.
//!
//! # Example
//!
//! ```ignore
//! use runtime::{AnthropicBackend, Chat, ChatClient, ChatOptions, McpToolHost, ToolHost};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let host = McpToolHost::spawn("python", ["weather.py"]).await?;
//! let options = ChatOptions::default().with_tools(host.specs().to_vec());
//! let backend = AnthropicBackend::builder("sk-ant-api03-...").build();
//!
//! let client = ChatClient::new(backend, host);
//! client.respond("What's the weather in Sacramento?", &options, &mut std::io::stdout()).await?;
//! # Ok(())
//! # }
//! ```

pub mod chat;
mod error;
pub mod model;
pub mod providers;
mod sse;
pub mod tools;

pub use chat::{Chat, ChatClient, ChatOptions};
pub use error::{Error, Result};
pub use model::{
    Backend, EventStream, FinishReason, Message, ModelError, ModelRequest, Part, Role,
    StreamEvent, ToolCall, ToolResult, ToolSpec, Usage,
};
pub use providers::{AnthropicBackend, AnthropicBackendBuilder};
pub use tools::{EmptyToolHost, McpClient, McpError, McpToolHost, ToolError, ToolHost};
