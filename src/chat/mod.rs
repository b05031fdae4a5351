//! Chat turns: persistence, model streaming, and command routing.
//!
//! Each turn posted by a client is classified once. Slash commands are
//! handed to [`crate::command::services::CommandExecutor`] and their outcome
//! is stored as a command exchange; everything else is streamed from a
//! [`ports::LanguageModel`] with command exchanges removed from its context.
//!
//! # Architecture
//!
//! - **Domain**: [`domain::Chat`], [`domain::Message`],
//!   [`domain::ChatRequest`], [`domain::StreamEvent`]
//! - **Ports**: [`ports::ChatRepository`], [`ports::LanguageModel`],
//!   [`ports::TitleGenerator`]
//! - **Services**: [`services::ChatService`], [`services::filter_history`]
//! - **Adapters**: in-memory and `PostgreSQL` repositories, and an Ollama
//!   client

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod tests;
