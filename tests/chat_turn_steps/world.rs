//! Shared world state for chat turn scenarios.

use std::sync::Arc;

use futures::StreamExt;
use memechat::{
    chat::{
        adapters::memory::InMemoryChatRepository,
        domain::{
            ChatId, ChatRequest, Identity, MessageId, RequestMessage, Role, StreamEvent, UserId,
        },
        services::{ChatService, ChatServiceError},
    },
    command::{registry::CommandRegistry, services::CommandExecutor},
};
use mockable::DefaultClock;
use rstest::fixture;

use crate::test_helpers::{
    model::{FixedTitle, ScriptedModel},
    trading::MockTrading,
};

/// Service type used by the BDD world.
pub type TestChatService =
    ChatService<InMemoryChatRepository, ScriptedModel, FixedTitle, DefaultClock>;

/// Scenario world for chat turn behaviour tests.
pub struct ChatWorld {
    pub service: TestChatService,
    pub repository: Arc<InMemoryChatRepository>,
    pub model: Arc<ScriptedModel>,
    pub chat_id: ChatId,
    pub history: Vec<RequestMessage>,
    pub events: Vec<StreamEvent>,
    pub last_error: Option<ChatServiceError>,
}

impl ChatWorld {
    /// Creates a world with an empty store and a backend that must not be
    /// called.
    #[must_use]
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryChatRepository::new());
        let model = Arc::new(ScriptedModel::new());
        let commands = CommandExecutor::new(
            CommandRegistry::builtin(),
            Arc::new(MockTrading::new()),
        );
        let service = ChatService::new(
            Arc::clone(&repository),
            Arc::clone(&model),
            Arc::new(FixedTitle("Meme coin chat")),
            Arc::new(commands),
            Arc::new(DefaultClock),
        );
        Self {
            service,
            repository,
            model,
            chat_id: ChatId::new(),
            history: Vec::new(),
            events: Vec::new(),
            last_error: None,
        }
    }

    /// Sends `content` as `user` (or anonymously) and records the outcome.
    ///
    /// On success the user message and the streamed assistant reply are
    /// appended to the client-side history, as a browser would.
    pub fn send(&mut self, user: Option<&str>, content: &str) {
        let message = RequestMessage::new(MessageId::new(), Role::User, content);
        let mut messages = self.history.clone();
        messages.push(message.clone());
        let request = ChatRequest {
            id: self.chat_id,
            messages,
            selected_chat_model: "chat-model-reasoning".to_owned(),
        };
        let identity = user.map(|name| Identity::new(UserId::new(name)));

        let outcome = run_async(async {
            let events = self.service.respond(identity.as_ref(), request).await?;
            Ok::<_, ChatServiceError>(events.collect::<Vec<_>>().await)
        });
        match outcome {
            Ok(events) => {
                self.history.push(message);
                if let Some(StreamEvent::Identity { message_id }) = events.first() {
                    self.history.push(RequestMessage::new(
                        *message_id,
                        Role::Assistant,
                        content_of(&events),
                    ));
                }
                self.events = events;
                self.last_error = None;
            }
            Err(err) => {
                self.events.clear();
                self.last_error = Some(err);
            }
        }
    }
}

impl Default for ChatWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Concatenates the content deltas of a reply.
pub fn content_of(events: &[StreamEvent]) -> String {
    events
        .iter()
        .filter_map(|event| match event {
            StreamEvent::ContentDelta(text) => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ChatWorld {
    ChatWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
