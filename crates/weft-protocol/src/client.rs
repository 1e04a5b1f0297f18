//! Model client trait implemented by provider adapters

use async_trait::async_trait;
use thiserror::Error;

use crate::{Request, ResponseReceiver};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("authentication failed: {0}")]
    Auth(String),
}

/// Result type for model operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Trait for model adapters.
///
/// `generate` returns the consumer half of a bounded response channel; for
/// non-streaming requests the channel yields exactly one final response, for
/// streaming requests a sequence of partial responses followed by one final
/// (or one error) response.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, request: Request) -> ClientResult<ResponseReceiver>;

    /// The model identifier
    fn model(&self) -> &str;

    /// The provider name
    fn provider(&self) -> &str;
}
