//! Name-indexed command registry.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::command::domain::CommandUsage;
use crate::command::handlers::{
    CommandHandler, CreateAndListCommand, CreateTokenCommand, CreateWalletCommand,
    GetSettingsCommand, HelpCommand, LiquidityCommand, ListTokensCommand, MarketMakerCommand,
    PriceCommand, QuoteCommand, SendTokenCommand, SwapCommand, TokenDetailCommand,
};

/// Errors raised while assembling a registry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandSchemaError {
    /// Two handlers claim the same name.
    #[error("command '{0}' is registered more than once")]
    DuplicateName(String),

    /// A handler name is not a lower-case token.
    #[error("command name '{0}' must be non-empty lower-case ASCII without spaces")]
    InvalidName(String),
}

/// Ordered set of command handlers, looked up by lower-case name.
///
/// Registration order is the order commands appear in `/help`.
#[derive(Clone)]
pub struct CommandRegistry {
    handlers: Vec<Arc<dyn CommandHandler>>,
    index: HashMap<&'static str, usize>,
}

impl CommandRegistry {
    /// Builds a registry from handlers in display order.
    ///
    /// # Errors
    ///
    /// Returns [`CommandSchemaError`] when a name is malformed or repeated.
    pub fn with_handlers(
        handlers: impl IntoIterator<Item = Arc<dyn CommandHandler>>,
    ) -> Result<Self, CommandSchemaError> {
        let handlers: Vec<_> = handlers.into_iter().collect();
        let mut index = HashMap::with_capacity(handlers.len());
        for (position, handler) in handlers.iter().enumerate() {
            let name = handler.usage().name;
            let well_formed = !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
            if !well_formed {
                return Err(CommandSchemaError::InvalidName(name.to_owned()));
            }
            if index.insert(name, position).is_some() {
                return Err(CommandSchemaError::DuplicateName(name.to_owned()));
            }
        }
        Ok(Self { handlers, index })
    }

    /// Returns the registry of built-in commands.
    #[must_use]
    pub fn builtin() -> Self {
        let handlers: Vec<Arc<dyn CommandHandler>> = vec![
            Arc::new(HelpCommand),
            Arc::new(CreateTokenCommand),
            Arc::new(SwapCommand),
            Arc::new(ListTokensCommand),
            Arc::new(TokenDetailCommand),
            Arc::new(MarketMakerCommand),
            Arc::new(GetSettingsCommand),
            Arc::new(SendTokenCommand),
            Arc::new(CreateAndListCommand),
            Arc::new(QuoteCommand),
            Arc::new(CreateWalletCommand),
            Arc::new(LiquidityCommand),
            Arc::new(PriceCommand),
        ];
        let index = handlers
            .iter()
            .enumerate()
            .map(|(position, handler)| (handler.usage().name, position))
            .collect();
        Self { handlers, index }
    }

    /// Looks up a handler by lower-case name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Arc<dyn CommandHandler>> {
        self.index
            .get(name)
            .and_then(|position| self.handlers.get(*position))
    }

    /// Iterates over catalogue entries in registration order.
    pub fn usages(&self) -> impl Iterator<Item = &'static CommandUsage> + '_ {
        self.handlers.iter().map(|handler| handler.usage())
    }

    /// Returns the number of registered commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` when no commands are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.usages().map(|u| u.name).collect::<Vec<_>>())
            .finish()
    }
}
