//! Route handlers.

use std::convert::Infallible;

use axum::{
    Json,
    body::{Body, Bytes},
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderName, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::AppState;
use crate::chat::{
    domain::{ChatId, ChatRequest},
    services::{ChatServiceError, EventStream},
};
use crate::command::domain::CommandInvocation;

const DATA_STREAM_HEADER: HeaderName = HeaderName::from_static("x-vercel-ai-data-stream");
const COMMAND_FAILURE: &str = "Error processing command";
const GENERIC_FAILURE: &str = "An error occurred while processing your request";

#[derive(Debug, Deserialize)]
pub(super) struct DeleteParams {
    id: Option<ChatId>,
}

pub(super) async fn post_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Response {
    let identity = state.auth.identify(&headers);
    let is_command = request
        .latest_user_message()
        .is_some_and(|message| CommandInvocation::parse(&message.content).is_some());
    let failure = if is_command {
        COMMAND_FAILURE
    } else {
        GENERIC_FAILURE
    };

    match state.chats.respond(identity.as_ref(), request).await {
        Ok(events) => data_stream(events),
        Err(err) => error_response(&err, failure),
    }
}

pub(super) async fn delete_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<DeleteParams>,
) -> Response {
    let Some(chat_id) = params.id else {
        return (StatusCode::NOT_FOUND, "Not Found").into_response();
    };
    let identity = state.auth.identify(&headers);

    match state.chats.delete_chat(identity.as_ref(), chat_id).await {
        Ok(()) => (StatusCode::OK, "Chat deleted").into_response(),
        Err(err) => error_response(&err, GENERIC_FAILURE),
    }
}

pub(super) async fn chat_messages(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(chat_id): Path<ChatId>,
) -> Response {
    let identity = state.auth.identify(&headers);

    match state.chats.messages(identity.as_ref(), chat_id).await {
        Ok(messages) => Json(messages).into_response(),
        Err(err) => error_response(&err, GENERIC_FAILURE),
    }
}

pub(super) async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Streams encoded frames as they are produced.
fn data_stream(events: EventStream) -> Response {
    let frames = events.filter_map(|event| async move {
        event
            .encode()
            .map(|line| Ok::<_, Infallible>(Bytes::from(line)))
    });
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/plain; charset=utf-8"),
            (DATA_STREAM_HEADER, "v1"),
        ],
        Body::from_stream(frames),
    )
        .into_response()
}

fn error_response(err: &ChatServiceError, failure: &'static str) -> Response {
    match err {
        ChatServiceError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
        ChatServiceError::BadRequest(message) => {
            (StatusCode::BAD_REQUEST, message.clone()).into_response()
        }
        ChatServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found").into_response(),
        ChatServiceError::Repository(source) => {
            error!(error = %source, "chat request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, failure).into_response()
        }
    }
}
