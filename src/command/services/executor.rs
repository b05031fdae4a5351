//! Dispatch of parsed invocations to registered handlers.

use std::sync::Arc;

use tracing::info;

use crate::command::domain::{CommandInvocation, CommandResult};
use crate::command::handlers::CommandContext;
use crate::command::ports::TradingAdapter;
use crate::command::registry::CommandRegistry;

/// Runs slash commands against the trading backend.
///
/// Execution never fails: unknown names, bad arguments, and backend errors
/// all come back as a failed [`CommandResult`]. Arguments are never logged
/// because they may carry private keys.
#[derive(Clone)]
pub struct CommandExecutor {
    registry: CommandRegistry,
    trading: Arc<dyn TradingAdapter>,
}

impl CommandExecutor {
    /// Creates an executor over `registry`.
    #[must_use]
    pub fn new(registry: CommandRegistry, trading: Arc<dyn TradingAdapter>) -> Self {
        Self { registry, trading }
    }

    /// Executes a parsed invocation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn demo(executor: memechat::command::services::CommandExecutor) {
    /// use memechat::command::domain::CommandInvocation;
    ///
    /// if let Some(invocation) = CommandInvocation::parse("/help") {
    ///     let result = executor.execute(&invocation).await;
    ///     assert!(result.is_success());
    /// }
    /// # }
    /// ```
    pub async fn execute(&self, invocation: &CommandInvocation) -> CommandResult {
        let name = invocation.name();
        let Some(handler) = self.registry.find(name) else {
            info!(command = name, "unknown command");
            return CommandResult::unknown_command();
        };

        let arguments = invocation.arguments();
        if !handler.arity().accepts(arguments.len()) {
            info!(
                command = name,
                argument_count = arguments.len(),
                "command rejected: wrong argument count"
            );
            return CommandResult::usage_failure(handler.usage().script);
        }

        let context = CommandContext {
            trading: self.trading.as_ref(),
            registry: &self.registry,
        };
        let result = handler.run(arguments, context).await;
        info!(command = name, success = result.is_success(), "command executed");
        result
    }
}

impl std::fmt::Debug for CommandExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandExecutor")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
