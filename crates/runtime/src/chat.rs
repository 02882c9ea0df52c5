//! Streaming chat with transparent tool invocation.
//!
//! A query is streamed to the model; when the model asks for tools, the
//! calls are executed through the [`ToolHost`] and their results are fed
//! back as the next turn, until the model answers without tool calls.

use std::future::Future;
use std::io::Write;

use futures_util::StreamExt;
use tracing::{debug, warn};

use crate::model::{
    Backend, Message, ModelRequest, Part, Role, StreamEvent, ToolResult, ToolSpec, Usage,
};
use crate::tools::ToolHost;
use crate::{Error, Result};

pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1000;
pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 10;

/// Per-session request options.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOptions {
    pub max_output_tokens: u32,
    pub model_id: String,
    pub tools: Vec<ToolSpec>,
}

impl ChatOptions {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            model_id: model_id.into(),
            tools: Vec::new(),
        }
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolSpec>) -> Self {
        self.tools = tools;
        self
    }
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

/// Something that can answer a query by streaming text to a writer.
pub trait Chat: Send + Sync {
    /// Stream the response to `query` into `out`, one fragment at a time.
    fn respond<W: Write + Send>(
        &self,
        query: &str,
        options: &ChatOptions,
        out: &mut W,
    ) -> impl Future<Output = Result<Usage>> + Send;
}

/// Chat client that resolves model tool calls through a tool host.
pub struct ChatClient<B, H> {
    backend: B,
    tools: H,
    max_tool_rounds: usize,
}

impl<B: Backend, H: ToolHost> ChatClient<B, H> {
    pub fn new(backend: B, tools: H) -> Self {
        Self {
            backend,
            tools,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }

    /// Limit how many tool rounds a single query may take.
    pub fn with_max_tool_rounds(mut self, max_tool_rounds: usize) -> Self {
        self.max_tool_rounds = max_tool_rounds;
        self
    }

    pub fn tools(&self) -> &H {
        &self.tools
    }

    /// Release the tool host, e.g. to shut its server down.
    pub fn into_tools(self) -> H {
        self.tools
    }

    async fn run_tools(&self, message: &Message) -> Vec<ToolResult> {
        let mut results = Vec::new();
        for call in message.tool_calls() {
            debug!(tool = %call.name, id = %call.id, "invoking tool");
            let result = match self.tools.execute(&call).await {
                Ok(output) => ToolResult::Success {
                    tool_call_id: call.id,
                    output,
                },
                Err(error) => {
                    warn!(tool = %call.name, %error, "tool call failed");
                    ToolResult::Failure {
                        tool_call_id: call.id,
                        error,
                    }
                }
            };
            results.push(result);
        }
        results
    }
}

impl<B: Backend, H: ToolHost> Chat for ChatClient<B, H> {
    async fn respond<W: Write + Send>(
        &self,
        query: &str,
        options: &ChatOptions,
        out: &mut W,
    ) -> Result<Usage> {
        let mut messages = vec![Message::user(query)];
        let mut usage = Usage::default();
        let mut rounds = 0;

        loop {
            let request = ModelRequest {
                model: &options.model_id,
                max_tokens: options.max_output_tokens,
                messages: &messages,
                tools: &options.tools,
            };
            let mut events = self.backend.stream(request).await?;

            let mut parts = Vec::new();
            let mut text = String::new();
            while let Some(event) = events.next().await {
                match event? {
                    StreamEvent::Text(fragment) => {
                        out.write_all(fragment.as_bytes())?;
                        out.flush()?;
                        text.push_str(&fragment);
                    }
                    StreamEvent::ToolCall(call) => {
                        if !text.is_empty() {
                            parts.push(Part::Text(std::mem::take(&mut text)));
                        }
                        parts.push(Part::ToolCall(call));
                    }
                    StreamEvent::Finished { reason, usage: turn } => {
                        debug!(?reason, ?turn, "turn finished");
                        usage += turn;
                    }
                }
            }
            if !text.is_empty() {
                parts.push(Part::Text(text));
            }

            let assistant = Message::from_parts(Role::Assistant, parts);
            if assistant.tool_calls().is_empty() {
                return Ok(usage);
            }

            rounds += 1;
            if rounds > self.max_tool_rounds {
                return Err(Error::ToolLoopLimit(self.max_tool_rounds));
            }

            let results = self.run_tools(&assistant).await;
            messages.push(assistant);
            messages.push(Message::tool_results(results));
        }
    }
}
