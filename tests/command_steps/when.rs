//! When steps for command catalogue scenarios.

use std::sync::Arc;

use memechat::command::{
    domain::CommandInvocation, registry::CommandRegistry, services::CommandExecutor,
};
use rstest_bdd_macros::when;

use super::world::{CommandWorld, run_async};
use crate::test_helpers::trading::MockTrading;

#[when(r#"the command "{input}" is executed"#)]
fn command_executed(world: &mut CommandWorld, input: String) -> Result<(), eyre::Report> {
    let invocation = CommandInvocation::parse(&input)
        .ok_or_else(|| eyre::eyre!("{input:?} is not a slash command"))?;
    let trading = world.trading.take().unwrap_or_else(MockTrading::new);
    let executor = CommandExecutor::new(CommandRegistry::builtin(), Arc::new(trading));

    world.result = Some(run_async(executor.execute(&invocation)));
    Ok(())
}
