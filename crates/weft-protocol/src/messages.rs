//! Message types for model communication

use serde::{Deserialize, Serialize};

/// Role of a message participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
    /// Anything outside the four chat roles. Deserialized from unknown
    /// wire values; always rejected by sequence validation.
    #[serde(other)]
    Unknown,
}

impl Role {
    pub fn is_valid(&self) -> bool {
        !matches!(self, Role::Unknown)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
            Self::Tool => write!(f, "tool"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A message in the conversation.
///
/// `content` and `content_parts` may both be set; multimodal payloads go in
/// `content_parts`, plain text in `content`. Tool-result messages carry the
/// id and name of the call they answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content_parts: Vec<ContentPart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_content: Option<String>,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self::text(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::text(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::text(Role::Assistant, content)
    }

    pub fn tool_result(
        tool_id: impl Into<String>,
        tool_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            tool_id: Some(tool_id.into()),
            tool_name: Some(tool_name.into()),
            ..Self::text(Role::Tool, content)
        }
    }

    pub fn assistant_with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            ..Self::text(Role::Assistant, content)
        }
    }

    pub fn with_content_parts(role: Role, content_parts: Vec<ContentPart>) -> Self {
        Self {
            content_parts,
            ..Self::text(role, "")
        }
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning_content = Some(reasoning.into());
        self
    }

    fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            content_parts: Vec::new(),
            tool_id: None,
            tool_name: None,
            tool_calls: Vec::new(),
            reasoning_content: None,
        }
    }

    /// Whether the message carries anything worth sending besides `content`:
    /// content parts, tool calls, or reasoning. Used to decide between
    /// placeholder content and dropping the message outright.
    pub fn has_payload(&self) -> bool {
        if !self.content.is_empty() {
            return true;
        }
        if self
            .reasoning_content
            .as_deref()
            .is_some_and(|r| !r.is_empty())
        {
            return true;
        }
        if !self.content_parts.is_empty() {
            return true;
        }
        self.tool_calls.iter().any(ToolCall::has_identity)
    }

    /// Whether any countable text field is non-empty. Token counters clamp
    /// their estimate up to 1 for such messages.
    pub fn has_countable_text(&self) -> bool {
        if !self.content.is_empty() {
            return true;
        }
        if self
            .reasoning_content
            .as_deref()
            .is_some_and(|r| !r.is_empty())
        {
            return true;
        }
        if self.content_parts.iter().any(|part| {
            matches!(part, ContentPart::Text { text } if !text.is_empty())
        }) {
            return true;
        }
        self.tool_calls.iter().any(ToolCall::has_identity)
    }
}

/// A content part within a multimodal message.
///
/// Only the text variant contributes to token estimates; the binary
/// variants are opaque to the tailoring core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text {
        text: String,
    },
    Image {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
    Audio {
        /// Base64-encoded audio data
        data: String,
        format: String,
    },
    File {
        #[serde(skip_serializing_if = "Option::is_none")]
        filename: Option<String>,
        /// Base64-encoded file data; pick one of `file_data` or `file_id`
        #[serde(skip_serializing_if = "Option::is_none")]
        file_data: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        file_id: Option<String>,
    },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn image(url: impl Into<String>, detail: Option<String>) -> Self {
        Self::Image {
            url: url.into(),
            detail,
        }
    }
}

/// A tool call issued by the assistant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Currently always "function"
    #[serde(rename = "type")]
    pub call_type: String,
    pub id: String,
    pub function: FunctionCall,
    /// Position of this call in streaming deltas
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

impl ToolCall {
    pub fn function(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            call_type: "function".to_string(),
            id: id.into(),
            function: FunctionCall {
                name: name.into(),
                description: None,
                arguments: arguments.into(),
            },
            index: None,
        }
    }

    /// Whether the call carries any identifying attribute at all.
    pub fn has_identity(&self) -> bool {
        !self.call_type.is_empty()
            || !self.id.is_empty()
            || !self.function.name.is_empty()
            || self
                .function
                .description
                .as_deref()
                .is_some_and(|d| !d.is_empty())
            || !self.function.arguments.is_empty()
    }
}

/// The function half of a tool call. Arguments stay opaque JSON text until a
/// provider adapter decodes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub arguments: String,
}
