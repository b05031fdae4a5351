//! Chat aggregate.

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use super::{ChatId, UserId};

/// Maximum number of characters of a command kept in a command chat title.
pub const COMMAND_TITLE_CHARS: usize = 50;

/// Maximum length of a chat title.
pub const MAX_TITLE_CHARS: usize = 80;

/// A conversation owned by one user.
///
/// The title is fixed when the chat is created on its first turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    id: ChatId,
    user_id: UserId,
    title: String,
    created_at: DateTime<Utc>,
}

impl Chat {
    /// Creates a chat stamped with the clock's current time.
    #[must_use]
    pub fn new(id: ChatId, user_id: UserId, title: impl Into<String>, clock: &impl Clock) -> Self {
        Self {
            id,
            user_id,
            title: title.into(),
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a chat from persisted fields.
    #[must_use]
    pub const fn from_parts(
        id: ChatId,
        user_id: UserId,
        title: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            title,
            created_at,
        }
    }

    /// Returns the chat identifier.
    #[must_use]
    pub const fn id(&self) -> ChatId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns when the chat was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns `true` when `user_id` owns this chat.
    #[must_use]
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }
}

/// Builds the title of a chat opened by a slash command.
///
/// ```
/// use memechat::chat::domain::command_title;
///
/// assert_eq!(command_title("/help"), "Command: /help");
/// ```
#[must_use]
pub fn command_title(raw: &str) -> String {
    format!("Command: {}", truncate_chars(raw, COMMAND_TITLE_CHARS))
}

/// Builds the fallback title used when title generation fails.
#[must_use]
pub fn fallback_title(message: &str) -> String {
    truncate_chars(message.trim(), MAX_TITLE_CHARS).to_owned()
}

/// Returns at most `limit` characters of `text`, respecting char boundaries.
#[must_use]
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    text.char_indices()
        .nth(limit)
        .and_then(|(end, _)| text.get(..end))
        .unwrap_or(text)
}
