//! Outbound stream events and their line encoding.

use serde_json::{Value, json};

use super::MessageId;

/// Text sent in place of further content when producing a reply fails.
pub const ERROR_FRAME_TEXT: &str = "Oops, an error occurred!";

/// One event of a streamed reply.
///
/// Both reply paths produce the same sequence shape: one
/// [`StreamEvent::Identity`], then deltas, then at most one
/// [`StreamEvent::Error`], then [`StreamEvent::End`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Announces the assistant message id before any content.
    Identity {
        /// Identifier of the assistant message being produced.
        message_id: MessageId,
    },
    /// An incremental fragment of visible text.
    ContentDelta(String),
    /// An incremental fragment of the model's reasoning trace.
    ReasoningDelta(String),
    /// Terminal human-readable error.
    Error(String),
    /// End of the reply.
    End,
}

impl StreamEvent {
    /// Encodes the event as one line of the data-stream protocol.
    ///
    /// Returns `None` for [`StreamEvent::End`], which is signalled by closing
    /// the channel.
    ///
    /// ```
    /// use memechat::chat::domain::StreamEvent;
    ///
    /// let frame = StreamEvent::ContentDelta("Hel\"lo".to_owned()).encode();
    /// assert_eq!(frame.as_deref(), Some("0:\"Hel\\\"lo\"\n"));
    /// assert_eq!(StreamEvent::End.encode(), None);
    /// ```
    #[must_use]
    pub fn encode(&self) -> Option<String> {
        let (code, payload) = match self {
            Self::Identity { message_id } => ('f', json!({ "messageId": message_id })),
            Self::ContentDelta(text) => ('0', Value::String(text.clone())),
            Self::ReasoningDelta(text) => ('g', Value::String(text.clone())),
            Self::Error(text) => ('3', Value::String(text.clone())),
            Self::End => return None,
        };
        Some(format!("{code}:{payload}\n"))
    }
}
