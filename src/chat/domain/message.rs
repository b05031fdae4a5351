//! Persisted chat messages.

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{ChatId, MessageId};

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions for the model.
    System,
    /// The human participant.
    User,
    /// The model or a command handler.
    Assistant,
}

impl Role {
    /// Returns the storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// Error returned when parsing an unknown role.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown message role '{0}'")]
pub struct ParseRoleError(pub String);

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "system" => Ok(Self::System),
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            other => Err(ParseRoleError(other.to_owned())),
        }
    }
}

/// Anything carrying a [`MessageId`].
pub trait Identified {
    /// Returns the message identifier.
    fn message_id(&self) -> MessageId;
}

/// A message stored in a chat.
///
/// `is_command` is fixed at construction. Command messages are excluded
/// from model context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    id: MessageId,
    chat_id: ChatId,
    role: Role,
    content: String,
    reasoning: Option<String>,
    is_command: bool,
    created_at: DateTime<Utc>,
}

impl Message {
    /// Creates a conversational message stamped with the clock's time.
    #[must_use]
    pub fn new(
        id: MessageId,
        chat_id: ChatId,
        role: Role,
        content: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id,
            chat_id,
            role,
            content: content.into(),
            reasoning: None,
            is_command: false,
            created_at: clock.utc(),
        }
    }

    /// Creates a command-originated message stamped with the clock's time.
    #[must_use]
    pub fn command(
        id: MessageId,
        chat_id: ChatId,
        role: Role,
        content: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            is_command: true,
            ..Self::new(id, chat_id, role, content, clock)
        }
    }

    /// Attaches a reasoning trace.
    #[must_use]
    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    /// Reconstructs a message from persisted fields.
    #[must_use]
    pub const fn from_parts(
        id: MessageId,
        chat_id: ChatId,
        role: Role,
        content: String,
        reasoning: Option<String>,
        is_command: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            chat_id,
            role,
            content,
            reasoning,
            is_command,
            created_at,
        }
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the owning chat.
    #[must_use]
    pub const fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    /// Returns the author role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the visible content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the reasoning trace, if any.
    #[must_use]
    pub fn reasoning(&self) -> Option<&str> {
        self.reasoning.as_deref()
    }

    /// Returns `true` for messages produced by the command path.
    #[must_use]
    pub const fn is_command(&self) -> bool {
        self.is_command
    }

    /// Returns when the message was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Identified for Message {
    fn message_id(&self) -> MessageId {
        self.id
    }
}
