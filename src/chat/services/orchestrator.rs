//! Response orchestration for one chat turn.
//!
//! A turn is classified once. Slash commands are executed, persisted as a
//! two-message exchange, and replayed as a single content frame. Everything
//! else goes to the language model with command exchanges filtered out of
//! its context, and the model's chunks are forwarded as they arrive.

use std::sync::Arc;

use futures::stream::{self, BoxStream, StreamExt};
use mockable::Clock;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error, info, warn};

use super::{filter_history, system_prompt};
use crate::chat::{
    domain::{
        Chat, ChatId, ChatRequest, ERROR_FRAME_TEXT, Identity, Message, MessageId, ReplyChunk,
        RequestMessage, Role, StreamEvent, UserId, command_title, fallback_title, sanitize_reply,
    },
    error::RepositoryError,
    ports::{ChatRepository, LanguageModel, ModelMessage, ModelRequest, TitleGenerator},
};
use crate::command::{domain::CommandInvocation, services::CommandExecutor};

/// Completion token cap applied when none is configured.
pub const DEFAULT_MAX_TOKENS: u32 = 192;

const EVENT_BUFFER: usize = 64;

/// Ordered events of one reply.
pub type EventStream = BoxStream<'static, StreamEvent>;

/// Errors that end a turn before any frame is produced.
#[derive(Debug, Error)]
pub enum ChatServiceError {
    /// The caller is not authenticated or does not own the chat.
    #[error("unauthorized")]
    Unauthorized,

    /// The request cannot be acted on.
    #[error("{0}")]
    BadRequest(String),

    /// The chat does not exist.
    #[error("chat not found: {0}")]
    NotFound(ChatId),

    /// A required read or write failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Result type for chat service operations.
pub type ChatServiceResult<T> = Result<T, ChatServiceError>;

/// Tunables for the model path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatSettings {
    /// Completion token cap per turn.
    pub max_tokens: u32,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// Drives chat turns, deletions, and history reads.
pub struct ChatService<R, M, T, C>
where
    R: ChatRepository + ?Sized,
    M: LanguageModel + ?Sized,
    T: TitleGenerator + ?Sized,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    model: Arc<M>,
    titles: Arc<T>,
    commands: Arc<CommandExecutor>,
    clock: Arc<C>,
    settings: ChatSettings,
}

impl<R, M, T, C> Clone for ChatService<R, M, T, C>
where
    R: ChatRepository + ?Sized,
    M: LanguageModel + ?Sized,
    T: TitleGenerator + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            model: Arc::clone(&self.model),
            titles: Arc::clone(&self.titles),
            commands: Arc::clone(&self.commands),
            clock: Arc::clone(&self.clock),
            settings: self.settings,
        }
    }
}

impl<R, M, T, C> ChatService<R, M, T, C>
where
    R: ChatRepository + ?Sized + 'static,
    M: LanguageModel + ?Sized + 'static,
    T: TitleGenerator + ?Sized,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a service with default settings.
    #[must_use]
    pub fn new(
        repository: Arc<R>,
        model: Arc<M>,
        titles: Arc<T>,
        commands: Arc<CommandExecutor>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            repository,
            model,
            titles,
            commands,
            clock,
            settings: ChatSettings::default(),
        }
    }

    /// Replaces the model-path settings.
    #[must_use]
    pub const fn with_settings(mut self, settings: ChatSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Handles one chat turn and returns its reply stream.
    ///
    /// Everything that must be durable before the first frame (the chat,
    /// the command exchange, the user message) is written before this
    /// returns. Failures after that point surface as a single
    /// [`StreamEvent::Error`] inside the stream.
    ///
    /// # Errors
    ///
    /// Returns [`ChatServiceError::Unauthorized`] without side effects when
    /// `identity` is absent or the chat belongs to someone else,
    /// [`ChatServiceError::BadRequest`] when the request holds no user
    /// message, and [`ChatServiceError::Repository`] when a required write
    /// fails.
    pub async fn respond(
        &self,
        identity: Option<&Identity>,
        request: ChatRequest,
    ) -> ChatServiceResult<EventStream> {
        let user = identity.ok_or(ChatServiceError::Unauthorized)?.user_id();
        let user_message = request
            .latest_user_message()
            .cloned()
            .ok_or_else(|| ChatServiceError::BadRequest("No user message found".to_owned()))?;
        let existing = self.owned_chat(user, request.id).await?;

        match CommandInvocation::parse(&user_message.content) {
            Some(invocation) => {
                self.respond_to_command(user, existing, request.id, &user_message, &invocation)
                    .await
            }
            None => {
                self.respond_with_model(user, existing, request, user_message)
                    .await
            }
        }
    }

    async fn respond_to_command(
        &self,
        user: &UserId,
        existing: Option<Chat>,
        chat_id: ChatId,
        user_message: &RequestMessage,
        invocation: &CommandInvocation,
    ) -> ChatServiceResult<EventStream> {
        info!(%chat_id, command = invocation.name(), "taking command path");
        let result = self.commands.execute(invocation).await;

        if existing.is_none() {
            self.create_chat(user, chat_id, command_title(invocation.raw()))
                .await?;
        }

        let assistant_id = MessageId::new();
        let body = result.into_body();
        let exchange = [
            Message::command(
                user_message.id,
                chat_id,
                Role::User,
                user_message.content.clone(),
                &*self.clock,
            ),
            Message::command(
                assistant_id,
                chat_id,
                Role::Assistant,
                body.clone(),
                &*self.clock,
            ),
        ];
        self.repository.append_messages(&exchange).await?;

        let events = [
            StreamEvent::Identity {
                message_id: assistant_id,
            },
            StreamEvent::ContentDelta(body),
            StreamEvent::End,
        ];
        Ok(stream::iter(events).boxed())
    }

    async fn respond_with_model(
        &self,
        user: &UserId,
        existing: Option<Chat>,
        request: ChatRequest,
        user_message: RequestMessage,
    ) -> ChatServiceResult<EventStream> {
        let chat_id = request.id;
        info!(%chat_id, selector = %request.selected_chat_model, "taking model path");

        if existing.is_none() {
            let title = self.generate_title(&user_message.content).await;
            self.create_chat(user, chat_id, title).await?;
        }

        let stored = Message::new(
            user_message.id,
            chat_id,
            Role::User,
            user_message.content,
            &*self.clock,
        );
        self.repository
            .append_messages(std::slice::from_ref(&stored))
            .await?;

        let command_ids = self.repository.command_message_ids(chat_id).await?;
        let context = filter_history(&request.messages, &command_ids);
        let model_request = ModelRequest {
            system: system_prompt(&request.selected_chat_model),
            messages: context
                .into_iter()
                .map(|message| ModelMessage {
                    role: message.role,
                    content: message.content,
                })
                .collect(),
            max_tokens: self.settings.max_tokens,
        };

        let (sender, receiver) = mpsc::channel(EVENT_BUFFER);
        let reply = ModelReply {
            chat_id,
            message_id: MessageId::new(),
            model: Arc::clone(&self.model),
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
            sender,
        };
        tokio::spawn(reply.run(model_request));

        Ok(ReceiverStream::new(receiver).boxed())
    }

    /// Deletes a chat owned by the caller, together with its messages.
    ///
    /// # Errors
    ///
    /// Returns [`ChatServiceError::Unauthorized`] when `identity` is absent
    /// or does not own the chat, [`ChatServiceError::NotFound`] when the
    /// chat does not exist, and [`ChatServiceError::Repository`] when the
    /// store fails.
    pub async fn delete_chat(
        &self,
        identity: Option<&Identity>,
        chat_id: ChatId,
    ) -> ChatServiceResult<()> {
        let user = identity.ok_or(ChatServiceError::Unauthorized)?.user_id();
        self.owned_chat(user, chat_id)
            .await?
            .ok_or(ChatServiceError::NotFound(chat_id))?;
        self.repository.delete_chat(chat_id).await?;
        info!(%chat_id, "chat deleted");
        Ok(())
    }

    /// Returns the persisted messages of a chat owned by the caller.
    ///
    /// # Errors
    ///
    /// Same as [`Self::delete_chat`].
    pub async fn messages(
        &self,
        identity: Option<&Identity>,
        chat_id: ChatId,
    ) -> ChatServiceResult<Vec<Message>> {
        let user = identity.ok_or(ChatServiceError::Unauthorized)?.user_id();
        self.owned_chat(user, chat_id)
            .await?
            .ok_or(ChatServiceError::NotFound(chat_id))?;
        Ok(self.repository.messages(chat_id).await?)
    }

    /// Loads a chat, rejecting chats that belong to another user.
    async fn owned_chat(
        &self,
        user: &UserId,
        chat_id: ChatId,
    ) -> ChatServiceResult<Option<Chat>> {
        match self.repository.find_chat(chat_id).await? {
            Some(chat) if !chat.is_owned_by(user) => {
                warn!(%chat_id, "chat access denied");
                Err(ChatServiceError::Unauthorized)
            }
            found => Ok(found),
        }
    }

    /// Creates a chat, tolerating a concurrent creation by the same owner.
    async fn create_chat(
        &self,
        user: &UserId,
        chat_id: ChatId,
        title: String,
    ) -> ChatServiceResult<()> {
        let chat = Chat::new(chat_id, user.clone(), title, &*self.clock);
        match self.repository.create_chat(&chat).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::DuplicateChat(_)) => {
                debug!(%chat_id, "chat created concurrently");
                self.owned_chat(user, chat_id).await.map(|_| ())
            }
            Err(error) => Err(error.into()),
        }
    }

    async fn generate_title(&self, message: &str) -> String {
        match self.titles.generate(message).await {
            Ok(title) => title,
            Err(error) => {
                warn!(error = %error, "title generation failed, using message prefix");
                fallback_title(message)
            }
        }
    }
}

/// Background producer for one model-path reply.
struct ModelReply<R, M, C>
where
    R: ChatRepository + ?Sized,
    M: LanguageModel + ?Sized,
    C: Clock + Send + Sync,
{
    chat_id: ChatId,
    message_id: MessageId,
    model: Arc<M>,
    repository: Arc<R>,
    clock: Arc<C>,
    sender: mpsc::Sender<StreamEvent>,
}

impl<R, M, C> ModelReply<R, M, C>
where
    R: ChatRepository + ?Sized,
    M: LanguageModel + ?Sized,
    C: Clock + Send + Sync,
{
    async fn run(self, request: ModelRequest) {
        let mut content = String::new();
        let mut reasoning = String::new();

        let mut connected = self
            .emit(StreamEvent::Identity {
                message_id: self.message_id,
            })
            .await;
        if !connected {
            info!(chat_id = %self.chat_id, "client disconnected before the reply started");
            return;
        }

        match self.model.stream(request).await {
            Ok(mut chunks) => {
                while connected {
                    let Some(item) = chunks.next().await else {
                        break;
                    };
                    match item {
                        Ok(ReplyChunk::Text(text)) => {
                            content.push_str(&text);
                            connected = self.emit(StreamEvent::ContentDelta(text)).await;
                        }
                        Ok(ReplyChunk::Reasoning(text)) => {
                            reasoning.push_str(&text);
                            connected = self.emit(StreamEvent::ReasoningDelta(text)).await;
                        }
                        Err(model_error) => {
                            warn!(
                                chat_id = %self.chat_id,
                                error = %model_error,
                                "model stream failed"
                            );
                            self.emit(StreamEvent::Error(ERROR_FRAME_TEXT.to_owned()))
                                .await;
                            break;
                        }
                    }
                }
                if !connected {
                    info!(
                        chat_id = %self.chat_id,
                        "client disconnected, no more tokens requested"
                    );
                }
            }
            Err(model_error) => {
                warn!(
                    chat_id = %self.chat_id,
                    error = %model_error,
                    "model stream could not start"
                );
                self.emit(StreamEvent::Error(ERROR_FRAME_TEXT.to_owned()))
                    .await;
            }
        }

        self.persist(&content, reasoning).await;
        self.emit(StreamEvent::End).await;
    }

    /// Stores the assistant reply. Failures are logged only.
    async fn persist(&self, content: &str, reasoning: String) {
        let reply = sanitize_reply(content, reasoning);
        if reply.content.is_empty() && reply.reasoning.is_none() {
            return;
        }

        let mut message = Message::new(
            self.message_id,
            self.chat_id,
            Role::Assistant,
            reply.content,
            &*self.clock,
        );
        if let Some(trace) = reply.reasoning {
            message = message.with_reasoning(trace);
        }
        if let Err(persist_error) = self
            .repository
            .append_messages(std::slice::from_ref(&message))
            .await
        {
            error!(
                chat_id = %self.chat_id,
                message_id = %self.message_id,
                error = %persist_error,
                "failed to save assistant message"
            );
        }
    }

    /// Sends an event, returning `false` once the client has gone away.
    async fn emit(&self, event: StreamEvent) -> bool {
        self.sender.send(event).await.is_ok()
    }
}
