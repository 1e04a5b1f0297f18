//! Request types sent to model adapters

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Message, ToolDeclaration};

/// Generation parameters shared by all providers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,

    /// Randomness (0.0 to 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Nucleus sampling (0.0 to 1.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,

    /// Whether the response should be streamed
    #[serde(default)]
    pub stream: bool,

    /// Sequences where generation stops
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,

    /// Extended-thinking switch for models that support it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_enabled: Option<bool>,

    /// Thinking length budget for models that support it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_tokens: Option<usize>,
}

/// A chat request to a model adapter.
///
/// Tools are keyed by name and handled out of band by each adapter, so they
/// are not part of the serialized form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Request {
    pub messages: Vec<Message>,

    #[serde(flatten)]
    pub generation: GenerationConfig,

    #[serde(skip)]
    pub tools: HashMap<String, ToolDeclaration>,
}

impl Request {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }
}
