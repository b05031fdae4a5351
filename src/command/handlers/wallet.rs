//! `/mW`.

use async_trait::async_trait;
use minijinja::context;

use super::{CommandContext, CommandHandler, adapter_failure, render};
use crate::command::domain::{Arity, CommandResult, CommandUsage};

static USAGE: CommandUsage = CommandUsage {
    name: "mw",
    script: "/mW",
    description: "Create a new wallet",
    example: "/mW",
};

const TEMPLATE: &str = "Wallet created successfully\n\n\
Address: {{ wallet.address }}\n\n\
Private Key: {{ wallet.privateKey }}\n\n\
Mnemonic: {{ wallet.mnemonic }}";

const FAILURE_PREFIX: &str = "Wallet created fail: ";

/// `/mW`: creates a wallet and reveals its keys to the requester.
#[derive(Debug, Default, Clone, Copy)]
pub struct CreateWalletCommand;

#[async_trait]
impl CommandHandler for CreateWalletCommand {
    fn usage(&self) -> &'static CommandUsage {
        &USAGE
    }

    fn arity(&self) -> Arity {
        Arity::Exact(0)
    }

    async fn run(&self, _args: &[String], context: CommandContext<'_>) -> CommandResult {
        match context.trading.create_wallet().await {
            Ok(wallets) => match wallets.first() {
                Some(wallet) => render(USAGE.name, TEMPLATE, context! { wallet => wallet }),
                None => CommandResult::backend_failure(FAILURE_PREFIX),
            },
            Err(error) => adapter_failure(USAGE.name, FAILURE_PREFIX, &error),
        }
    }
}
