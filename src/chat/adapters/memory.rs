//! In-memory implementation of the `ChatRepository` port.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::batch_chat;
use crate::chat::{
    domain::{Chat, ChatId, Message, MessageId},
    error::RepositoryError,
    ports::{ChatRepository, RepositoryResult},
};

#[derive(Debug, Default)]
struct Store {
    chats: HashMap<ChatId, Chat>,
    messages: HashMap<ChatId, Vec<Message>>,
    message_ids: HashSet<MessageId>,
}

/// In-memory implementation of [`ChatRepository`].
///
/// A single [`RwLock`] guards chats and messages together, so every append
/// is atomic and reads see all completed writes.
///
/// # Example
///
/// ```
/// use memechat::chat::adapters::memory::InMemoryChatRepository;
///
/// let repo = InMemoryChatRepository::new();
/// assert_eq!(repo.message_count(), 0);
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemoryChatRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryChatRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored messages across all chats.
    ///
    /// Returns `0` if the internal lock is poisoned.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.store
            .read()
            .map(|guard| guard.message_ids.len())
            .unwrap_or(0)
    }

    fn read(&self) -> RepositoryResult<std::sync::RwLockReadGuard<'_, Store>> {
        self.store
            .read()
            .map_err(|e| RepositoryError::connection(format!("lock poisoned: {e}")))
    }

    fn write(&self) -> RepositoryResult<std::sync::RwLockWriteGuard<'_, Store>> {
        self.store
            .write()
            .map_err(|e| RepositoryError::connection(format!("lock poisoned: {e}")))
    }
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn find_chat(&self, id: ChatId) -> RepositoryResult<Option<Chat>> {
        Ok(self.read()?.chats.get(&id).cloned())
    }

    async fn create_chat(&self, chat: &Chat) -> RepositoryResult<()> {
        let mut guard = self.write()?;
        if guard.chats.contains_key(&chat.id()) {
            return Err(RepositoryError::DuplicateChat(chat.id()));
        }
        guard.chats.insert(chat.id(), chat.clone());
        Ok(())
    }

    async fn delete_chat(&self, id: ChatId) -> RepositoryResult<()> {
        let mut guard = self.write()?;
        guard.chats.remove(&id);
        if let Some(removed) = guard.messages.remove(&id) {
            for message in &removed {
                guard.message_ids.remove(&message.id());
            }
        }
        Ok(())
    }

    async fn append_messages(&self, messages: &[Message]) -> RepositoryResult<()> {
        let Some(chat_id) = batch_chat(messages)? else {
            return Ok(());
        };
        let mut guard = self.write()?;
        if !guard.chats.contains_key(&chat_id) {
            return Err(RepositoryError::ChatNotFound(chat_id));
        }
        if let Some(taken) = messages
            .iter()
            .find(|message| guard.message_ids.contains(&message.id()))
        {
            return Err(RepositoryError::DuplicateMessage(taken.id()));
        }

        guard
            .message_ids
            .extend(messages.iter().map(Message::id));
        guard
            .messages
            .entry(chat_id)
            .or_default()
            .extend_from_slice(messages);
        Ok(())
    }

    async fn command_message_ids(&self, chat_id: ChatId) -> RepositoryResult<HashSet<MessageId>> {
        Ok(self
            .read()?
            .messages
            .get(&chat_id)
            .map(|messages| {
                messages
                    .iter()
                    .filter(|message| message.is_command())
                    .map(Message::id)
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn messages(&self, chat_id: ChatId) -> RepositoryResult<Vec<Message>> {
        Ok(self
            .read()?
            .messages
            .get(&chat_id)
            .cloned()
            .unwrap_or_default())
    }
}
