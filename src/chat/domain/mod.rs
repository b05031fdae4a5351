//! Domain types for chats, messages, and streamed replies.

mod chat;
mod event;
mod ids;
mod message;
mod reasoning;
mod request;

pub use chat::{
    COMMAND_TITLE_CHARS, Chat, MAX_TITLE_CHARS, command_title, fallback_title, truncate_chars,
};
pub use event::{ERROR_FRAME_TEXT, StreamEvent};
pub use ids::{ChatId, Identity, MessageId, UserId};
pub use message::{Identified, Message, ParseRoleError, Role};
pub use reasoning::{ReplyChunk, SanitizedReply, ThinkTagSplitter, sanitize_reply};
pub use request::{ChatRequest, DEFAULT_MODEL_SELECTOR, RequestMessage};
