//! Slash-command handling for the chat front-end.
//!
//! Messages that begin with `/` bypass the language model and are resolved
//! against a fixed registry of typed handlers, each of which talks to the
//! trading backend through the [`ports::trading::TradingAdapter`] port and
//! renders its outcome as text.
//!
//! # Architecture
//!
//! - **Domain**: [`domain::CommandInvocation`], [`domain::CommandResult`],
//!   [`domain::CommandUsage`]
//! - **Ports**: [`ports::trading::TradingAdapter`]
//! - **Handlers**: one [`handlers::CommandHandler`] per built-in command
//! - **Registry**: [`registry::CommandRegistry`], name to handler in
//!   deterministic order
//! - **Services**: [`services::CommandExecutor`], the total execution
//!   boundary that always yields a [`domain::CommandResult`]
//! - **Adapters**: [`adapters::http::HttpTradingAdapter`]

pub mod adapters;
pub mod domain;
pub mod handlers;
pub mod ports;
pub mod registry;
pub mod services;

#[cfg(test)]
pub(crate) mod tests;
