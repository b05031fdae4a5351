//! Textual outcome of a slash command.

use serde::{Deserialize, Serialize};

/// Body used whenever the trading backend cannot serve a request.
pub const GENERIC_FAILURE: &str = "Internal server error. Please try again later";

/// Outcome of executing a slash command.
///
/// Successes and failures share one representation: a flag and a rendered
/// text body. No structured error crosses the executor boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    success: bool,
    body: String,
}

impl CommandResult {
    /// Creates a successful result.
    #[must_use]
    pub fn success(body: impl Into<String>) -> Self {
        Self {
            success: true,
            body: body.into(),
        }
    }

    /// Creates a failed result.
    #[must_use]
    pub fn failure(body: impl Into<String>) -> Self {
        Self {
            success: false,
            body: body.into(),
        }
    }

    /// Creates the usage failure for a command invoked with bad arguments.
    #[must_use]
    pub fn usage_failure(script: &str) -> Self {
        Self::failure(format!("Invalid command format. Please use: {script}"))
    }

    /// Creates the failure returned for a name missing from the registry.
    #[must_use]
    pub fn unknown_command() -> Self {
        Self::failure("Unknown command. Type /help for available commands.")
    }

    /// Creates a retry-later failure with a command-specific prefix.
    #[must_use]
    pub fn backend_failure(prefix: &str) -> Self {
        Self::failure(format!("{prefix}{GENERIC_FAILURE}"))
    }

    /// Returns `true` when the command succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.success
    }

    /// Returns the rendered body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Consumes the result, returning the rendered body.
    #[must_use]
    pub fn into_body(self) -> String {
        self.body
    }
}
