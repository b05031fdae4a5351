//! Command catalogue entries.

use serde::Serialize;

/// Number of arguments a command accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many arguments.
    Exact(usize),
    /// Any number of arguments, including none.
    Any,
}

impl Arity {
    /// Returns `true` when `count` arguments satisfy this arity.
    #[must_use]
    pub const fn accepts(self, count: usize) -> bool {
        match self {
            Self::Exact(expected) => expected == count,
            Self::Any => true,
        }
    }
}

/// Help and usage text for one registered command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandUsage {
    /// Lower-case command name without the leading slash.
    pub name: &'static str,
    /// Usage script listing the arguments in their required order.
    pub script: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Example invocation.
    pub example: &'static str,
}
