//! Persistence error types for the chat store.

use std::sync::Arc;

use thiserror::Error;

use super::domain::{ChatId, MessageId};

/// Errors raised by [`ChatRepository`](super::ports::ChatRepository)
/// implementations.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// A chat with this id already exists.
    #[error("duplicate chat: {0}")]
    DuplicateChat(ChatId),

    /// A message with this id already exists.
    #[error("duplicate message: {0}")]
    DuplicateMessage(MessageId),

    /// One append carried messages for more than one chat.
    #[error("batch mixes chats {expected} and {found}")]
    MixedChats {
        /// Chat of the first message in the batch.
        expected: ChatId,
        /// Chat of the first message that differs.
        found: ChatId,
    },

    /// Messages were appended to a chat that does not exist.
    #[error("chat not found: {0}")]
    ChatNotFound(ChatId),

    /// The database rejected the operation.
    #[error("database error: {0}")]
    Database(Arc<dyn std::error::Error + Send + Sync>),

    /// A stored row could not be mapped onto the domain.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// No connection could be obtained.
    #[error("connection error: {0}")]
    Connection(String),
}

impl RepositoryError {
    /// Creates a database error from any error type.
    #[must_use]
    pub fn database(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Database(Arc::new(err))
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }
}

impl From<diesel::result::Error> for RepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::database(err)
    }
}
