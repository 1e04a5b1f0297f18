//! Weft Protocol - Shared model-layer types
//!
//! This crate defines the types that flow between the tailoring core and
//! provider adapters:
//! - Message types (roles, content parts, tool calls)
//! - Request and response shapes for chat endpoints
//! - The bounded streaming channel adapters emit responses into
//! - The `ModelClient` trait adapters implement

mod client;
mod messages;
mod request;
mod response;
mod stream;
mod tools;

pub use client::{ClientError, ClientResult, ModelClient};
pub use messages::{ContentPart, FunctionCall, Message, Role, ToolCall};
pub use request::{GenerationConfig, Request};
pub use response::{
    Choice, Response, ResponseError, TimingInfo, Usage, ERROR_TYPE_API_ERROR,
    ERROR_TYPE_STREAM_ERROR, OBJECT_TYPE_CHAT_COMPLETION, OBJECT_TYPE_CHAT_COMPLETION_CHUNK,
};
pub use stream::{response_channel, ResponseReceiver, ResponseSender, DEFAULT_STREAM_CAPACITY};
pub use tools::ToolDeclaration;
