//! Anthropic API backend.

use std::collections::{BTreeMap, VecDeque};

use crate::model::{
    Backend, EventStream, FinishReason, Message, ModelError, ModelRequest, Part, Role,
    StreamEvent, ToolCall, ToolResult, ToolSpec, Usage,
};
use crate::sse::{SseDecoder, SseFrame};
use futures_util::{Stream, StreamExt, stream};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

// ─────────────────────────────────────────────────────────────────────────────
// API Wire Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ApiRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ApiTool>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: &'static str,
    content: ApiContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ApiContent {
    Text(String),
    Blocks(Vec<ApiContentBlock>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ApiContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        is_error: bool,
    },
}

#[derive(Debug, Serialize)]
struct ApiTool {
    name: String,
    description: String,
    input_schema: Value,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ApiStreamEvent {
    MessageStart {
        message: ApiMessageStart,
    },
    ContentBlockStart {
        index: usize,
        content_block: ApiStartBlock,
    },
    ContentBlockDelta {
        index: usize,
        delta: ApiDelta,
    },
    ContentBlockStop {
        index: usize,
    },
    MessageDelta {
        delta: ApiMessageDelta,
        #[serde(default)]
        usage: ApiUsage,
    },
    MessageStop,
    Ping,
    Error {
        error: ApiErrorBody,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
struct ApiMessageStart {
    #[serde(default)]
    usage: ApiUsage,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ApiStartBlock {
    Text {
        #[serde(default)]
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ApiDelta {
    TextDelta { text: String },
    InputJsonDelta { partial_json: String },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
struct ApiMessageDelta {
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiUsage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Stream Assembly
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct PendingToolCall {
    id: String,
    name: String,
    json: String,
}

/// Turns decoded SSE frames into stream events for one turn.
#[derive(Debug, Default)]
struct TurnAssembler {
    pending: BTreeMap<usize, PendingToolCall>,
    reason: FinishReason,
    usage: Usage,
    complete: bool,
}

impl TurnAssembler {
    fn push(&mut self, frame: &SseFrame) -> Result<Vec<StreamEvent>, ModelError> {
        let event: ApiStreamEvent = serde_json::from_str(&frame.data).map_err(|e| {
            ModelError::InvalidResponse(format!("undecodable event {:?}: {e}", frame.event))
        })?;

        let mut events = Vec::new();
        match event {
            ApiStreamEvent::MessageStart { message } => {
                self.usage.input_tokens = message.usage.input_tokens;
                self.usage.output_tokens = message.usage.output_tokens;
            }
            ApiStreamEvent::ContentBlockStart {
                index,
                content_block,
            } => match content_block {
                ApiStartBlock::Text { text } if !text.is_empty() => {
                    events.push(StreamEvent::Text(text));
                }
                ApiStartBlock::ToolUse { id, name } => {
                    self.pending.insert(
                        index,
                        PendingToolCall {
                            id,
                            name,
                            json: String::new(),
                        },
                    );
                }
                _ => {}
            },
            ApiStreamEvent::ContentBlockDelta { index, delta } => match delta {
                ApiDelta::TextDelta { text } => {
                    if !text.is_empty() {
                        events.push(StreamEvent::Text(text));
                    }
                }
                ApiDelta::InputJsonDelta { partial_json } => {
                    let call = self.pending.get_mut(&index).ok_or_else(|| {
                        ModelError::InvalidResponse(format!(
                            "input delta for unknown block {index}"
                        ))
                    })?;
                    call.json.push_str(&partial_json);
                }
                ApiDelta::Unknown => {}
            },
            ApiStreamEvent::ContentBlockStop { index } => {
                if let Some(call) = self.pending.remove(&index) {
                    events.push(StreamEvent::ToolCall(call.finish()?));
                }
            }
            ApiStreamEvent::MessageDelta { delta, usage } => {
                if let Some(reason) = delta.stop_reason {
                    self.reason = finish_reason(&reason);
                }
                if usage.output_tokens > 0 {
                    self.usage.output_tokens = usage.output_tokens;
                }
            }
            ApiStreamEvent::MessageStop => {
                self.complete = true;
                events.push(StreamEvent::Finished {
                    reason: std::mem::take(&mut self.reason),
                    usage: self.usage,
                });
            }
            ApiStreamEvent::Error { error } => {
                return Err(ModelError::Api(format!("{}: {}", error.kind, error.message)));
            }
            ApiStreamEvent::Ping | ApiStreamEvent::Unknown => {}
        }
        Ok(events)
    }
}

impl PendingToolCall {
    fn finish(self) -> Result<ToolCall, ModelError> {
        let input = if self.json.trim().is_empty() {
            Value::Object(Default::default())
        } else {
            serde_json::from_str(&self.json).map_err(|e| {
                ModelError::InvalidResponse(format!("tool input for {}: {e}", self.name))
            })?
        };
        Ok(ToolCall {
            id: self.id,
            name: self.name,
            input,
        })
    }
}

fn finish_reason(reason: &str) -> FinishReason {
    match reason {
        "end_turn" | "stop_sequence" => FinishReason::Stop,
        "tool_use" => FinishReason::ToolCalls,
        "max_tokens" => FinishReason::Length,
        "refusal" => FinishReason::ContentFilter,
        other => FinishReason::Unknown(other.to_string()),
    }
}

struct EventState<B> {
    body: stream::BoxStream<'static, Result<B, ModelError>>,
    decoder: SseDecoder,
    assembler: TurnAssembler,
    ready: VecDeque<Result<StreamEvent, ModelError>>,
    done: bool,
}

impl<B> EventState<B> {
    fn absorb(&mut self, frames: impl IntoIterator<Item = SseFrame>) {
        for frame in frames {
            trace!(event = ?frame.event, "sse frame");
            match self.assembler.push(&frame) {
                Ok(events) => self.ready.extend(events.into_iter().map(Ok)),
                Err(e) => {
                    self.ready.push_back(Err(e));
                    self.done = true;
                    return;
                }
            }
            if self.assembler.complete {
                self.done = true;
                return;
            }
        }
    }
}

/// Decode a streamed response body into turn events.
///
/// The stream ends after `message_stop`, after the first error, or when
/// the body closes. A body that closes before `message_stop` yields an
/// `InvalidResponse` error.
fn into_events<S, B, E>(body: S) -> EventStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + 'static,
{
    let body = body
        .map(|chunk| chunk.map_err(|e| ModelError::Network(e.to_string())))
        .boxed();

    let state = EventState {
        body,
        decoder: SseDecoder::new(),
        assembler: TurnAssembler::default(),
        ready: VecDeque::new(),
        done: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.ready.pop_front() {
                return Some((item, state));
            }
            if state.done {
                return None;
            }

            match state.body.next().await {
                Some(Ok(chunk)) => {
                    let frames = state.decoder.feed(chunk.as_ref());
                    state.absorb(frames);
                }
                Some(Err(e)) => {
                    state.ready.push_back(Err(e));
                    state.done = true;
                }
                None => {
                    let trailing = state.decoder.finish();
                    state.absorb(trailing);
                    if !state.assembler.complete && !state.done {
                        state.ready.push_back(Err(ModelError::InvalidResponse(
                            "stream closed before message_stop".into(),
                        )));
                    }
                    state.done = true;
                }
            }
        }
    })
    .boxed()
}

// ─────────────────────────────────────────────────────────────────────────────
// Backend Implementation
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for creating an Anthropic backend.
#[derive(Debug, Clone)]
pub struct AnthropicBackendBuilder {
    api_key: String,
    base_url: String,
}

impl AnthropicBackendBuilder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the API origin (proxies, test servers).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn build(self) -> AnthropicBackend {
        AnthropicBackend {
            client: reqwest::Client::new(),
            api_key: self.api_key,
            base_url: self.base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// Anthropic Messages API backend with streaming responses.
pub struct AnthropicBackend {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl AnthropicBackend {
    pub fn builder(api_key: impl Into<String>) -> AnthropicBackendBuilder {
        AnthropicBackendBuilder::new(api_key)
    }

    fn role_to_api(role: Role) -> &'static str {
        match role {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    fn message_to_api(msg: &Message) -> ApiMessage {
        let role = Self::role_to_api(msg.role);

        // Simple case: single text part
        if let [Part::Text(text)] = msg.parts.as_slice() {
            return ApiMessage {
                role,
                content: ApiContent::Text(text.clone()),
            };
        }

        let blocks: Vec<ApiContentBlock> = msg
            .parts
            .iter()
            .map(|part| match part {
                Part::Text(text) => ApiContentBlock::Text { text: text.clone() },
                Part::ToolCall(call) => ApiContentBlock::ToolUse {
                    id: call.id.clone(),
                    name: call.name.clone(),
                    input: call.input.clone(),
                },
                Part::ToolResult(result) => {
                    let (content, is_error) = match result {
                        ToolResult::Success { output, .. } => (render_tool_output(output), false),
                        ToolResult::Failure { error, .. } => (error.to_string(), true),
                    };
                    ApiContentBlock::ToolResult {
                        tool_use_id: result.tool_call_id().to_string(),
                        content,
                        is_error,
                    }
                }
            })
            .collect();

        ApiMessage {
            role,
            content: ApiContent::Blocks(blocks),
        }
    }

    fn tool_to_api(spec: &ToolSpec) -> ApiTool {
        ApiTool {
            name: spec.name.clone(),
            description: spec.description.clone(),
            input_schema: spec.schema.clone(),
        }
    }

    fn build_request(request: &ModelRequest<'_>) -> ApiRequest {
        ApiRequest {
            model: request.model.to_string(),
            max_tokens: request.max_tokens,
            messages: request.messages.iter().map(Self::message_to_api).collect(),
            tools: request.tools.iter().map(Self::tool_to_api).collect(),
            stream: true,
        }
    }
}

/// Render tool output as the text the model sees.
///
/// MCP content arrives as an array of typed blocks; text blocks are joined,
/// anything else is passed as JSON.
fn render_tool_output(output: &Value) -> String {
    match output {
        Value::String(text) => text.clone(),
        Value::Array(blocks) => {
            let texts: Option<Vec<&str>> = blocks
                .iter()
                .map(|block| match block.get("type").and_then(Value::as_str) {
                    Some("text") => block.get("text").and_then(Value::as_str),
                    _ => None,
                })
                .collect();
            match texts {
                Some(texts) => texts.join("\n"),
                None => output.to_string(),
            }
        }
        other => other.to_string(),
    }
}

impl Backend for AnthropicBackend {
    async fn stream(&self, request: ModelRequest<'_>) -> Result<EventStream, ModelError> {
        let api_request = Self::build_request(&request);
        debug!(
            model = %api_request.model,
            messages = api_request.messages.len(),
            tools = api_request.tools.len(),
            "sending streaming request"
        );

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .header("accept", "text/event-stream")
            .header("x-api-key", &self.api_key)
            .json(&api_request)
            .send()
            .await
            .map_err(|e| ModelError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Api(format!("{status}: {body}")));
        }

        Ok(into_events(response.bytes_stream()))
    }
}
