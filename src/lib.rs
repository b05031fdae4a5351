//! Memechat: a command-aware streaming chat front-end for a meme-coin
//! trading backend.
//!
//! Each chat turn is either a slash command, resolved against a fixed
//! registry of handlers that call the trading backend, or a conversational
//! message, streamed from a language model. Both paths persist the exchange
//! and answer with the same line-oriented frame protocol.
//!
//! # Architecture
//!
//! Memechat follows hexagonal architecture principles:
//!
//! - **Domain**: Pure types with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage, models, and trading
//! - **Adapters**: Concrete implementations of ports (`PostgreSQL`, Ollama,
//!   HTTP)
//!
//! # Modules
//!
//! - [`command`]: Slash-command parsing, registry, and execution
//! - [`chat`]: Chat persistence, history filtering, and turn orchestration
//! - [`server`]: HTTP routes
//! - [`config`]: Environment-driven configuration

pub mod chat;
pub mod command;
pub mod config;
pub mod server;
