//! Shared world state for command catalogue scenarios.

use memechat::command::domain::CommandResult;
use rstest::fixture;

use crate::test_helpers::trading::MockTrading;

/// Scenario world for command catalogue behaviour tests.
///
/// Expectations are set on `trading` by the given steps; the mock moves into
/// the executor when the command runs. A mock with no expectations fails any
/// backend call.
pub struct CommandWorld {
    pub trading: Option<MockTrading>,
    pub result: Option<CommandResult>,
}

impl CommandWorld {
    /// Creates a world with an unscripted backend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            trading: Some(MockTrading::new()),
            result: None,
        }
    }

    /// Returns the backend mock for scripting.
    pub fn trading(&mut self) -> &mut MockTrading {
        self.trading.get_or_insert_with(MockTrading::new)
    }
}

impl Default for CommandWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> CommandWorld {
    CommandWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
