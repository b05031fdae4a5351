//! Built-in slash-command handlers.
//!
//! Each handler owns one command: its usage text, its arity, the coercion
//! of raw arguments into a typed adapter payload, and the rendering of the
//! adapter's answer. Every path through [`CommandHandler::run`] ends in a
//! [`CommandResult`].

mod help;
mod market_maker;
mod swap;
mod token;
mod wallet;

use async_trait::async_trait;
use minijinja::Environment;
use serde_json::Number;

use crate::command::domain::{Arity, CommandResult, CommandUsage, sanitize_argument};
use crate::command::ports::trading::{AdapterError, TradingAdapter};
use crate::command::registry::CommandRegistry;

pub use help::HelpCommand;
pub use market_maker::{GetSettingsCommand, MarketMakerCommand};
pub use swap::{LiquidityCommand, PriceCommand, QuoteCommand, SwapCommand};
pub use token::{
    CreateAndListCommand, CreateTokenCommand, ListTokensCommand, SendTokenCommand,
    TokenDetailCommand,
};
pub use wallet::CreateWalletCommand;

/// Collaborators available to a running handler.
#[derive(Clone, Copy)]
pub struct CommandContext<'a> {
    /// Trading backend.
    pub trading: &'a dyn TradingAdapter,
    /// Registry the handler was resolved from.
    pub registry: &'a CommandRegistry,
}

/// A single slash command.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Returns the catalogue entry for this command.
    fn usage(&self) -> &'static CommandUsage;

    /// Returns the number of arguments the command accepts.
    fn arity(&self) -> Arity;

    /// Runs the command with raw arguments whose count matches
    /// [`Self::arity`].
    async fn run(&self, args: &[String], context: CommandContext<'_>) -> CommandResult;
}

/// Sanitizes every raw argument.
fn sanitized(args: &[String]) -> Vec<String> {
    args.iter().map(|arg| sanitize_argument(arg)).collect()
}

/// Parses a JSON number, preferring integer representations.
fn parse_number(raw: &str) -> Option<Number> {
    if let Ok(unsigned) = raw.parse::<u64>() {
        return Some(Number::from(unsigned));
    }
    if let Ok(signed) = raw.parse::<i64>() {
        return Some(Number::from(signed));
    }
    raw.parse::<f64>().ok().and_then(Number::from_f64)
}

/// Parses a number, substituting `fallback` when unparsable or zero.
fn number_or(raw: &str, fallback: u64) -> Number {
    parse_number(raw)
        .filter(|number| number.as_f64().is_some_and(|value| value.abs() > f64::EPSILON))
        .unwrap_or_else(|| Number::from(fallback))
}

/// Logs the adapter failure and converts it into a retry-later result.
fn adapter_failure(command: &str, prefix: &str, error: &AdapterError) -> CommandResult {
    tracing::warn!(command, error = %error, "trading backend call failed");
    CommandResult::backend_failure(prefix)
}

/// Renders a result template as a successful result.
fn render(command: &str, template: &str, context: minijinja::Value) -> CommandResult {
    let environment = Environment::new();
    match environment.render_str(template, context) {
        Ok(body) => CommandResult::success(body),
        Err(error) => {
            tracing::error!(command, error = %error, "command result template failed to render");
            CommandResult::backend_failure("")
        }
    }
}

const DATE_FORMAT: &str = "%a %b %d %Y";
