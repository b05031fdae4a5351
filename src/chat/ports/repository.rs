//! Repository port for chat persistence.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::chat::{
    domain::{Chat, ChatId, Message, MessageId},
    error::RepositoryError,
};

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Port for chat and message storage.
///
/// # Implementation Notes
///
/// Implementations must ensure:
/// - Chat and message ids are unique
/// - [`ChatRepository::append_messages`] stores all messages or none
/// - One append targets exactly one chat
/// - Concurrent appends to one chat never interleave within a call
/// - A read observes every append that completed before it started
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Looks up a chat.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    async fn find_chat(&self, id: ChatId) -> RepositoryResult<Option<Chat>>;

    /// Stores a new chat.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::DuplicateChat`] when the id is taken, or
    /// another `RepositoryError` if the write fails.
    async fn create_chat(&self, chat: &Chat) -> RepositoryResult<()>;

    /// Deletes a chat together with all of its messages.
    ///
    /// Deleting a missing chat is not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the write fails.
    async fn delete_chat(&self, id: ChatId) -> RepositoryResult<()>;

    /// Appends messages, in order, as one atomic unit.
    ///
    /// Every message in the batch must belong to the same chat. An empty
    /// batch is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::MixedChats`],
    /// [`RepositoryError::ChatNotFound`] or
    /// [`RepositoryError::DuplicateMessage`] without storing anything, or
    /// another `RepositoryError` if the write fails.
    async fn append_messages(&self, messages: &[Message]) -> RepositoryResult<()>;

    /// Returns the ids of the chat's command-originated messages.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    async fn command_message_ids(&self, chat_id: ChatId) -> RepositoryResult<HashSet<MessageId>>;

    /// Returns the chat's messages in append order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    async fn messages(&self, chat_id: ChatId) -> RepositoryResult<Vec<Message>>;
}
