//! Adapters for the chat ports.
//!
//! - [`memory::InMemoryChatRepository`]: thread-safe storage for tests and
//!   database-less runs
//! - [`postgres::PostgresChatRepository`]: `PostgreSQL` persistence using
//!   Diesel ORM
//! - [`ollama::OllamaClient`]: streamed completions and chat titles from an
//!   Ollama server

pub mod memory;
pub mod ollama;
pub mod postgres;

use std::collections::HashSet;

use crate::chat::{
    domain::{ChatId, Message},
    error::RepositoryError,
    ports::RepositoryResult,
};

/// Checks the batch rules shared by every store and returns the batch's
/// chat, or `None` for an empty batch.
///
/// Rejects batches that span chats or repeat a message id.
pub(crate) fn batch_chat(batch: &[Message]) -> RepositoryResult<Option<ChatId>> {
    let Some(first) = batch.first() else {
        return Ok(None);
    };
    let expected = first.chat_id();
    let mut seen = HashSet::with_capacity(batch.len());
    for message in batch {
        if message.chat_id() != expected {
            return Err(RepositoryError::MixedChats {
                expected,
                found: message.chat_id(),
            });
        }
        if !seen.insert(message.id()) {
            return Err(RepositoryError::DuplicateMessage(message.id()));
        }
    }
    Ok(Some(expected))
}
