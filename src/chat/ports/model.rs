//! Language-model port.

use async_trait::async_trait;
use futures::stream::BoxStream;
use thiserror::Error;

use crate::chat::domain::{ReplyChunk, Role};

/// Chunks of a streamed completion, in production order.
pub type ModelStream = BoxStream<'static, Result<ReplyChunk, ModelError>>;

/// A message in the model's context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelMessage {
    /// Author role.
    pub role: Role,
    /// Message text.
    pub content: String,
}

/// A streamed completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRequest {
    /// System prompt.
    pub system: String,
    /// Conversation context, oldest first.
    pub messages: Vec<ModelMessage>,
    /// Completion token cap.
    pub max_tokens: u32,
}

/// Errors raised by language-model providers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    /// The provider could not be reached.
    #[error("model provider unreachable: {0}")]
    Transport(String),

    /// The provider answered with a non-success status.
    #[error("model provider returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// A streamed frame could not be decoded.
    #[error("malformed model output: {0}")]
    Decode(String),

    /// The provider reported an error in-band.
    #[error("model provider error: {0}")]
    Provider(String),
}

/// Port for streaming text generation.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Starts a completion and returns its chunk stream.
    ///
    /// Reasoning is already split from visible text in the returned chunks.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] when the completion cannot be started. Errors
    /// after the first chunk arrive inside the stream.
    async fn stream(&self, request: ModelRequest) -> Result<ModelStream, ModelError>;
}
