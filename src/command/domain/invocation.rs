//! Slash-command parser.

use serde::{Deserialize, Serialize};

/// Character that marks a message as a slash command.
pub const COMMAND_PREFIX: char = '/';

/// A parsed slash-command invocation.
///
/// Parsing never rejects a command: unknown names and malformed arguments
/// are resolved later by the executor, which owns all domain validation.
///
/// # Examples
///
/// ```
/// use memechat::command::domain::CommandInvocation;
///
/// let invocation = CommandInvocation::parse("/mCreate DogeCoin DOGE 10000000")
///     .expect("slash prefix present");
/// assert_eq!(invocation.name(), "mcreate");
/// assert_eq!(invocation.arguments(), ["DogeCoin", "DOGE", "10000000"]);
///
/// assert!(CommandInvocation::parse("hello there").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandInvocation {
    name: String,
    arguments: Vec<String>,
    raw: String,
}

impl CommandInvocation {
    /// Parses raw message text into an invocation.
    ///
    /// Returns `None` when the text does not start with [`COMMAND_PREFIX`].
    /// Tokens are separated by any run of whitespace, including tabs and
    /// newlines. The first token (minus the prefix) is lower-cased to form
    /// the command name and the remaining tokens are kept verbatim as
    /// arguments; coercion is left to each handler.
    #[must_use]
    pub fn parse(raw_input: &str) -> Option<Self> {
        if !raw_input.starts_with(COMMAND_PREFIX) {
            return None;
        }

        let mut tokens = raw_input.split_whitespace();
        let name = tokens
            .next()
            .and_then(|token| token.strip_prefix(COMMAND_PREFIX))
            .map(str::to_lowercase)
            .unwrap_or_default();
        let arguments = tokens.map(str::to_owned).collect();

        Some(Self {
            name,
            arguments,
            raw: raw_input.to_owned(),
        })
    }

    /// Returns the lower-cased command name without the leading slash.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the raw, unsanitized arguments in order.
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Returns the message text the invocation was parsed from.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// Trims an argument and removes embedded tab and newline characters.
///
/// ```
/// use memechat::command::domain::sanitize_argument;
///
/// assert_eq!(sanitize_argument(" 0xAB\t\n"), "0xAB");
/// assert_eq!(sanitize_argument("Doge\tCoin"), "DogeCoin");
/// ```
#[must_use]
pub fn sanitize_argument(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|character| !matches!(character, '\t' | '\n'))
        .collect()
}
