//! Token deployment, lookup, and distribution commands.

use async_trait::async_trait;
use minijinja::context;
use serde::Serialize;

use super::{
    CommandContext, CommandHandler, DATE_FORMAT, adapter_failure, parse_number, render, sanitized,
};
use crate::command::domain::{Arity, CommandResult, CommandUsage};
use crate::command::ports::trading::{
    CreateAndListRequest, CreateTokenRequest, SendTokensRequest, TokenInfo, TokenQuery,
};

const NO_TOKENS: &str = "No tokens found";

/// Template shared by the listing and detail commands.
const TOKEN_FIELDS: &str = "Address: {{ token.address }}\n\n\
Name: {{ token.name }}\n\n\
Symbol: {{ token.symbol }}\n\n\
Decimals: {{ token.decimals }}\n\n\
Total Supply: {{ token.total_supply }}\n\n\
Hash: {{ token.created_hash }}\n\n\
Issue Date: {{ token.issued }}";

#[derive(Serialize)]
struct TokenView<'a> {
    address: &'a str,
    name: &'a str,
    symbol: &'a str,
    decimals: u32,
    total_supply: String,
    created_hash: &'a str,
    issued: String,
}

impl<'a> From<&'a TokenInfo> for TokenView<'a> {
    fn from(token: &'a TokenInfo) -> Self {
        Self {
            address: &token.address,
            name: &token.name,
            symbol: &token.symbol,
            decimals: token.decimals,
            total_supply: token.total_supply.to_string(),
            created_hash: &token.created_hash,
            issued: token.created_at.format(DATE_FORMAT).to_string(),
        }
    }
}

static CREATE_USAGE: CommandUsage = CommandUsage {
    name: "mcreate",
    script: "/mCreate <name> <token> <supply>",
    description: "Create a meme coin",
    example: "/mCreate DogeCoin DOGE 10000000",
};

const CREATE_TEMPLATE: &str = "Meme coin created.\n\n\
Name: {{ name }}\n\n\
Token: {{ symbol }}\n\n\
Total Supply: {{ total_supply }}\n\n\
Address: {{ address }}\n\n\
TxHash: {{ tx_hash }}";

/// `/mCreate <name> <token> <supply>`: deploys a token.
#[derive(Debug, Default, Clone, Copy)]
pub struct CreateTokenCommand;

#[async_trait]
impl CommandHandler for CreateTokenCommand {
    fn usage(&self) -> &'static CommandUsage {
        &CREATE_USAGE
    }

    fn arity(&self) -> Arity {
        Arity::Exact(3)
    }

    async fn run(&self, args: &[String], context: CommandContext<'_>) -> CommandResult {
        let Ok([name, symbol, supply]) = <[String; 3]>::try_from(sanitized(args)) else {
            return CommandResult::usage_failure(CREATE_USAGE.script);
        };
        let Some(total_supply) = parse_number(&supply) else {
            return CommandResult::usage_failure(CREATE_USAGE.script);
        };

        let request = CreateTokenRequest {
            name,
            symbol,
            total_supply,
        };
        match context.trading.create_token(&request).await {
            Ok(created) => render(
                CREATE_USAGE.name,
                CREATE_TEMPLATE,
                context! {
                    name => request.name,
                    symbol => request.symbol,
                    total_supply => request.total_supply.to_string(),
                    address => created.address,
                    tx_hash => created.tx_hash,
                },
            ),
            Err(error) => adapter_failure(CREATE_USAGE.name, "Meme coin create failed: ", &error),
        }
    }
}

static CREATE_V3_USAGE: CommandUsage = CommandUsage {
    name: "mcreatev3",
    script: "/mCreateV3 <name> <token> <supply> <tokenAddress> <tokenAmount> <initialAmount>",
    description: "Create a new token and list to uniswap v3",
    example: "/mCreateV3 DogeCoin DOGE 10000000 0x1234567890123456789012345678901234567890 100000 100000",
};

const CREATE_V3_TEMPLATE: &str = "Meme coin created.\n\n\
Name: {{ name }}\n\n\
Token: {{ symbol }}\n\n\
Total Supply: {{ total_supply }}\n\n\
Transaction: {{ transaction }}";

/// `/mCreateV3`: deploys a token and lists it on a Uniswap v3 pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct CreateAndListCommand;

#[async_trait]
impl CommandHandler for CreateAndListCommand {
    fn usage(&self) -> &'static CommandUsage {
        &CREATE_V3_USAGE
    }

    fn arity(&self) -> Arity {
        Arity::Exact(6)
    }

    async fn run(&self, args: &[String], context: CommandContext<'_>) -> CommandResult {
        let Ok([name, symbol, supply, liq_token_address, liq_amount, initial]) =
            <[String; 6]>::try_from(sanitized(args))
        else {
            return CommandResult::usage_failure(CREATE_V3_USAGE.script);
        };
        let (Some(total_supply), Some(liq_token_amount), Some(initial_amount)) = (
            parse_number(&supply),
            parse_number(&liq_amount),
            parse_number(&initial),
        ) else {
            return CommandResult::usage_failure(CREATE_V3_USAGE.script);
        };

        let request = CreateAndListRequest {
            name,
            symbol,
            total_supply,
            liq_token_address,
            liq_token_amount,
            initial_amount,
        };
        match context.trading.create_and_list_token(&request).await {
            Ok(listed) if !listed.transaction.is_empty() => render(
                CREATE_V3_USAGE.name,
                CREATE_V3_TEMPLATE,
                context! {
                    name => request.name,
                    symbol => request.symbol,
                    total_supply => request.total_supply.to_string(),
                    transaction => listed.transaction,
                },
            ),
            Ok(_) => CommandResult::backend_failure("Uniswap token create failed: "),
            Err(error) => adapter_failure(
                CREATE_V3_USAGE.name,
                "Uniswap token create failed: ",
                &error,
            ),
        }
    }
}

static LIST_USAGE: CommandUsage = CommandUsage {
    name: "mlisttokens",
    script: "/mListTokens <address> <name> <symbol>",
    description: "List tokens",
    example: "/mListTokens 0x1234567890123456789012345678901234567890 MTK MTK",
};

/// `/mListTokens <address> <name> <symbol>`: lists matching tokens.
#[derive(Debug, Default, Clone, Copy)]
pub struct ListTokensCommand;

#[async_trait]
impl CommandHandler for ListTokensCommand {
    fn usage(&self) -> &'static CommandUsage {
        &LIST_USAGE
    }

    fn arity(&self) -> Arity {
        Arity::Exact(3)
    }

    async fn run(&self, args: &[String], context: CommandContext<'_>) -> CommandResult {
        let Ok([address, name, symbol]) = <[String; 3]>::try_from(sanitized(args)) else {
            return CommandResult::usage_failure(LIST_USAGE.script);
        };
        let query = TokenQuery {
            address,
            name,
            symbol,
        };

        match context.trading.list_tokens(&query).await {
            Ok(tokens) if tokens.is_empty() => CommandResult::success(NO_TOKENS),
            Ok(tokens) => {
                let views: Vec<TokenView<'_>> = tokens.iter().map(TokenView::from).collect();
                let template = format!(
                    "List tokens:\n\n{{% for token in tokens %}}------------\n\n{TOKEN_FIELDS}\n\n{{% endfor %}}"
                );
                render(LIST_USAGE.name, &template, context! { tokens => views })
            }
            Err(error) => adapter_failure(LIST_USAGE.name, "Token list failed: ", &error),
        }
    }
}

static DETAIL_USAGE: CommandUsage = CommandUsage {
    name: "mtokendetail",
    script: "/mTokenDetail <address>",
    description: "Get token detail",
    example: "/mTokenDetail 0x1234567890123456789012345678901234567890",
};

/// `/mTokenDetail <address>`: shows one token.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokenDetailCommand;

#[async_trait]
impl CommandHandler for TokenDetailCommand {
    fn usage(&self) -> &'static CommandUsage {
        &DETAIL_USAGE
    }

    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    async fn run(&self, args: &[String], context: CommandContext<'_>) -> CommandResult {
        let Ok([address]) = <[String; 1]>::try_from(sanitized(args)) else {
            return CommandResult::usage_failure(DETAIL_USAGE.script);
        };

        match context.trading.token_detail(&address).await {
            Ok(Some(token)) => render(
                DETAIL_USAGE.name,
                &format!("Token detail:\n\n{TOKEN_FIELDS}"),
                context! { token => TokenView::from(&token) },
            ),
            Ok(None) => CommandResult::success(NO_TOKENS),
            Err(error) => adapter_failure(DETAIL_USAGE.name, "Token list failed: ", &error),
        }
    }
}

static SEND_USAGE: CommandUsage = CommandUsage {
    name: "msendtoken",
    script: "/mSendToken <address> <amount> <privateKey> <wallet1>,<wallet2>,<wallet3>,...",
    description: "Send meme coin token",
    example: "/mSendToken 0x1234567890123456789012345678901234567890 100 <privateKey> 0xA1,0xB2",
};

/// `/mSendToken`: distributes tokens to a comma-separated wallet list.
#[derive(Debug, Default, Clone, Copy)]
pub struct SendTokenCommand;

#[async_trait]
impl CommandHandler for SendTokenCommand {
    fn usage(&self) -> &'static CommandUsage {
        &SEND_USAGE
    }

    fn arity(&self) -> Arity {
        Arity::Exact(4)
    }

    async fn run(&self, args: &[String], context: CommandContext<'_>) -> CommandResult {
        let Ok([address, amount, private_key, wallets]) =
            <[String; 4]>::try_from(sanitized(args))
        else {
            return CommandResult::usage_failure(SEND_USAGE.script);
        };
        let Some(amount) = parse_number(&amount) else {
            return CommandResult::usage_failure(SEND_USAGE.script);
        };
        let wallets: Vec<String> = wallets
            .split(',')
            .filter(|wallet| !wallet.is_empty())
            .map(str::to_owned)
            .collect();
        if wallets.is_empty() {
            return CommandResult::usage_failure(SEND_USAGE.script);
        }

        let request = SendTokensRequest {
            address,
            amount,
            private_key,
            wallets,
        };
        match context.trading.send_tokens(&request).await {
            Ok(()) => CommandResult::success("Meme coin send successfully"),
            Err(error) => adapter_failure(SEND_USAGE.name, "Meme coin send failed: ", &error),
        }
    }
}
