//! Inbound chat turn.

use serde::{Deserialize, Serialize};

use super::{ChatId, Identified, MessageId, Role};

/// Model selector used when the client does not send one.
pub const DEFAULT_MODEL_SELECTOR: &str = "chat-model-reasoning";

fn default_model_selector() -> String {
    DEFAULT_MODEL_SELECTOR.to_owned()
}

/// One chat turn as posted by the client.
///
/// `messages` is the client's view of the whole conversation; only the most
/// recent `user` message is acted on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Chat the turn belongs to. Created on first use.
    pub id: ChatId,
    /// Conversation so far, oldest first.
    pub messages: Vec<RequestMessage>,
    /// Which prompt profile to run the model with.
    #[serde(default = "default_model_selector", alias = "modelSelector")]
    pub selected_chat_model: String,
}

impl ChatRequest {
    /// Returns the most recent message with the `user` role.
    #[must_use]
    pub fn latest_user_message(&self) -> Option<&RequestMessage> {
        self.messages.iter().rev().find(|message| message.role == Role::User)
    }
}

/// A message inside a [`ChatRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestMessage {
    /// Client-assigned identifier.
    pub id: MessageId,
    /// Author role.
    pub role: Role,
    /// Message text.
    pub content: String,
}

impl RequestMessage {
    /// Creates a request message.
    #[must_use]
    pub fn new(id: MessageId, role: Role, content: impl Into<String>) -> Self {
        Self {
            id,
            role,
            content: content.into(),
        }
    }
}

impl Identified for RequestMessage {
    fn message_id(&self) -> MessageId {
        self.id
    }
}
