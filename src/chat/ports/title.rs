//! Title-generation port.

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while generating a title.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TitleError {
    /// The generator could not produce a title.
    #[error("title generation failed: {0}")]
    Failed(String),

    /// The generator produced an empty title.
    #[error("title generation returned an empty title")]
    Empty,
}

/// Summarizes a user's first message into a chat title.
#[async_trait]
pub trait TitleGenerator: Send + Sync {
    /// Generates a title for `message`.
    ///
    /// # Errors
    ///
    /// Returns [`TitleError`] when no title can be produced.
    async fn generate(&self, message: &str) -> Result<String, TitleError>;
}
