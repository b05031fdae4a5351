//! Domain types for slash-command handling.
//!
//! These types carry no infrastructure dependencies and never fail to
//! construct: parsing is total and results are plain text.

mod invocation;
mod result;
mod usage;

pub use invocation::{COMMAND_PREFIX, CommandInvocation, sanitize_argument};
pub use result::{CommandResult, GENERIC_FAILURE};
pub use usage::{Arity, CommandUsage};
