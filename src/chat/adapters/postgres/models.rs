//! Diesel row types and their mapping onto the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{chats, messages};
use crate::chat::{
    domain::{Chat, ChatId, Message, MessageId, Role, UserId},
    error::RepositoryError,
};

/// Database row representation of a chat.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = chats)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChatRow {
    /// Chat identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: String,
    /// Title.
    pub title: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<&Chat> for ChatRow {
    fn from(chat: &Chat) -> Self {
        Self {
            id: chat.id().into_inner(),
            user_id: chat.user_id().as_str().to_owned(),
            title: chat.title().to_owned(),
            created_at: chat.created_at(),
        }
    }
}

impl From<ChatRow> for Chat {
    fn from(row: ChatRow) -> Self {
        Self::from_parts(
            ChatId::from_uuid(row.id),
            UserId::new(row.user_id),
            row.title,
            row.created_at,
        )
    }
}

/// Database row representation of a message.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MessageRow {
    /// Message identifier.
    pub id: Uuid,
    /// Owning chat.
    pub chat_id: Uuid,
    /// Author role.
    pub role: String,
    /// Visible content.
    pub content: String,
    /// Reasoning trace.
    pub reasoning: Option<String>,
    /// Command-path flag.
    pub is_command: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Append order.
    pub position: i64,
}

impl TryFrom<MessageRow> for Message {
    type Error = RepositoryError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let role = Role::try_from(row.role.as_str())
            .map_err(|e| RepositoryError::serialization(e.to_string()))?;
        Ok(Self::from_parts(
            MessageId::from_uuid(row.id),
            ChatId::from_uuid(row.chat_id),
            role,
            row.content,
            row.reasoning,
            row.is_command,
            row.created_at,
        ))
    }
}

/// Data for inserting a message. `position` is assigned by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = messages)]
pub struct NewMessage {
    /// Message identifier.
    pub id: Uuid,
    /// Owning chat.
    pub chat_id: Uuid,
    /// Author role.
    pub role: String,
    /// Visible content.
    pub content: String,
    /// Reasoning trace.
    pub reasoning: Option<String>,
    /// Command-path flag.
    pub is_command: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<&Message> for NewMessage {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id().into_inner(),
            chat_id: message.chat_id().into_inner(),
            role: message.role().as_str().to_owned(),
            content: message.content().to_owned(),
            reasoning: message.reasoning().map(str::to_owned),
            is_command: message.is_command(),
            created_at: message.created_at(),
        }
    }
}
