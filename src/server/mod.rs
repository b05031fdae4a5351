//! HTTP surface for the chat service.
//!
//! | Route | Purpose |
//! |---|---|
//! | `POST /api/chat` | run one turn, streamed as data-stream frames |
//! | `DELETE /api/chat?id=<chat>` | delete an owned chat |
//! | `GET /api/chat/{id}/messages` | list an owned chat's messages |
//! | `GET /health` | liveness check |

pub mod auth;
mod handlers;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use mockable::DefaultClock;
use tower_http::trace::TraceLayer;

use crate::chat::{
    ports::{ChatRepository, LanguageModel, TitleGenerator},
    services::ChatService,
};

pub use auth::AuthSettings;

/// Chat service over boxed collaborators, as served over HTTP.
pub type DynChatService =
    ChatService<dyn ChatRepository, dyn LanguageModel, dyn TitleGenerator, DefaultClock>;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    chats: Arc<DynChatService>,
    auth: Arc<AuthSettings>,
}

impl AppState {
    /// Bundles the chat service with the caller identification settings.
    #[must_use]
    pub fn new(chats: DynChatService, auth: AuthSettings) -> Self {
        Self {
            chats: Arc::new(chats),
            auth: Arc::new(auth),
        }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/chat",
            post(handlers::post_chat).delete(handlers::delete_chat),
        )
        .route("/api/chat/{id}/messages", get(handlers::chat_messages))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests;
