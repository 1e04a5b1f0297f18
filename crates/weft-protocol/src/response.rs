//! Response types returned by model adapters

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Message;

/// Error type for stream-level failures
pub const ERROR_TYPE_STREAM_ERROR: &str = "stream_error";
/// Error type for API-level failures
pub const ERROR_TYPE_API_ERROR: &str = "api_error";

/// Object type for complete chat responses
pub const OBJECT_TYPE_CHAT_COMPLETION: &str = "chat.completion";
/// Object type for streamed chat response chunks
pub const OBJECT_TYPE_CHAT_COMPLETION_CHUNK: &str = "chat.completion.chunk";

/// A single completion choice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    pub index: usize,

    /// Complete message for non-streaming responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,

    /// Incremental message for streaming responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<Message>,

    /// "stop", "length", "tool_calls", "content_filter", ...
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Accumulated generation timings across the calls of one flow
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimingInfo {
    /// Duration from request start to the first meaningful token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_first_token: Option<Duration>,

    /// Accumulated duration of reasoning phases (streaming only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_duration: Option<Duration>,
}

/// Token usage reported by the provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
    #[serde(default)]
    pub cached_tokens: usize,
    #[serde(default)]
    pub cache_creation_tokens: usize,
    #[serde(default)]
    pub cache_read_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<TimingInfo>,
}

/// API-level error carried inside a response.
///
/// Distinct from transport errors: the request reached the provider, but the
/// provider reported a failure (rate limit, content filter, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseError {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// A response (or streamed response chunk) from a model adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub id: String,

    /// Object kind, e.g. "chat.completion"
    pub object: String,

    /// Unix timestamp the provider created the response at
    pub created: i64,

    pub model: String,

    pub choices: Vec<Choice>,

    /// May be absent on intermediate streaming chunks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ResponseError>,

    /// When this chunk was received locally
    pub timestamp: DateTime<Utc>,

    /// Whether the flow driving this response should stop
    #[serde(default)]
    pub done: bool,

    /// Whether this is a partial (streaming) response
    #[serde(default)]
    pub is_partial: bool,
}

impl Response {
    pub fn error(model: impl Into<String>, error_type: &str, message: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            object: "error".to_string(),
            created: Utc::now().timestamp(),
            model: model.into(),
            choices: Vec::new(),
            usage: None,
            error: Some(ResponseError {
                message: message.into(),
                error_type: error_type.to_string(),
                param: None,
                code: None,
            }),
            timestamp: Utc::now(),
            done: true,
            is_partial: false,
        }
    }

    /// Text of the first choice, empty when there is none.
    pub fn text(&self) -> &str {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref().or(c.delta.as_ref()))
            .map(|m| m.content.as_str())
            .unwrap_or("")
    }
}
