//! Swap, pricing, and liquidity commands.

use async_trait::async_trait;
use minijinja::context;

use super::{CommandContext, CommandHandler, adapter_failure, parse_number, render, sanitized};
use crate::command::domain::{Arity, CommandResult, CommandUsage};
use crate::command::ports::trading::{
    LiquidityRequest, PriceQuote, PriceRequest, QuoteRequest, SwapRequest,
};

const QUOTE_FIELDS: &str = "Sell Token: {{ quote.sellToken }}\n\n\
Buy Token: {{ quote.buyToken }}\n\n\
Sell Amount: {{ quote.sellAmount }}\n\n\
Buy Amount: {{ quote.buyAmount }}";

fn render_quote(command: &str, heading: &str, quote: &PriceQuote) -> CommandResult {
    render(
        command,
        &format!("{heading}\n\n{QUOTE_FIELDS}"),
        context! { quote => quote },
    )
}

static SWAP_USAGE: CommandUsage = CommandUsage {
    name: "mswap",
    script: "/mSwap <chainId> <sellToken> <buyToken> <sellAmount> <slippageBps>",
    description: "Swap tokens",
    example: "/mSwap 8453 0x1234567890123456789012345678901234567890 0x1234567890123456789012345678901234567890 0.5 100",
};

/// `/mSwap`: swaps one token for another.
#[derive(Debug, Default, Clone, Copy)]
pub struct SwapCommand;

#[async_trait]
impl CommandHandler for SwapCommand {
    fn usage(&self) -> &'static CommandUsage {
        &SWAP_USAGE
    }

    fn arity(&self) -> Arity {
        Arity::Exact(5)
    }

    async fn run(&self, args: &[String], context: CommandContext<'_>) -> CommandResult {
        let Ok([chain_id, sell_token, buy_token, sell_amount, slippage_bps]) =
            <[String; 5]>::try_from(sanitized(args))
        else {
            return CommandResult::usage_failure(SWAP_USAGE.script);
        };
        let (Ok(chain_id), Some(sell_amount), Some(slippage_bps)) = (
            chain_id.parse::<u64>(),
            parse_number(&sell_amount),
            parse_number(&slippage_bps),
        ) else {
            return CommandResult::usage_failure(SWAP_USAGE.script);
        };

        let request = SwapRequest {
            chain_id,
            sell_token,
            buy_token,
            sell_amount,
            slippage_bps,
        };
        match context.trading.swap_tokens(&request).await {
            Ok(receipt) => render(
                SWAP_USAGE.name,
                "Token Swapped.\n\n------------\n\nTransaction Hash: {{ hash }}",
                context! { hash => receipt.transaction_hash },
            ),
            Err(error) => adapter_failure(SWAP_USAGE.name, "Token swap failed: ", &error),
        }
    }
}

static QUOTE_USAGE: CommandUsage = CommandUsage {
    name: "mquote",
    script: "/mQuote <chainId> <sellToken> <buyToken> <sellAmount> <slippageBps>",
    description: "Get quote for a swap",
    example: "/mQuote 8453 0x1234567890123456789012345678901234567890 0x1234567890123456789012345678901234567890 0.5 100",
};

/// `/mQuote`: quotes a swap without executing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct QuoteCommand;

#[async_trait]
impl CommandHandler for QuoteCommand {
    fn usage(&self) -> &'static CommandUsage {
        &QUOTE_USAGE
    }

    fn arity(&self) -> Arity {
        Arity::Exact(5)
    }

    async fn run(&self, args: &[String], context: CommandContext<'_>) -> CommandResult {
        let Ok([chain_id, sell_token, buy_token, sell_amount, slippage_bps]) =
            <[String; 5]>::try_from(sanitized(args))
        else {
            return CommandResult::usage_failure(QUOTE_USAGE.script);
        };
        let Ok(chain_id) = chain_id.parse::<u64>() else {
            return CommandResult::usage_failure(QUOTE_USAGE.script);
        };

        let request = QuoteRequest {
            chain_id,
            sell_token,
            buy_token,
            sell_amount,
            slippage_bps,
        };
        match context.trading.quote(&request).await {
            Ok(quote) => render_quote(QUOTE_USAGE.name, "Quoted meme:\n\n--------", &quote),
            Err(error) => adapter_failure(QUOTE_USAGE.name, "", &error),
        }
    }
}

static PRICE_USAGE: CommandUsage = CommandUsage {
    name: "mprice",
    script: "/mprice <chainId> <sellToken> <buyToken> <slippageBps>",
    description: "Get price for a swap",
    example: "/mprice 8453 0x1234567890123456789012345678901234567890 0x1234567890123456789012345678901234567890 100",
};

/// `/mprice`: prices a token pair.
#[derive(Debug, Default, Clone, Copy)]
pub struct PriceCommand;

#[async_trait]
impl CommandHandler for PriceCommand {
    fn usage(&self) -> &'static CommandUsage {
        &PRICE_USAGE
    }

    fn arity(&self) -> Arity {
        Arity::Exact(4)
    }

    async fn run(&self, args: &[String], context: CommandContext<'_>) -> CommandResult {
        let Ok([chain_id, sell_token, buy_token, slippage_bps]) =
            <[String; 4]>::try_from(sanitized(args))
        else {
            return CommandResult::usage_failure(PRICE_USAGE.script);
        };
        let Ok(chain_id) = chain_id.parse::<u64>() else {
            return CommandResult::usage_failure(PRICE_USAGE.script);
        };

        let request = PriceRequest {
            chain_id,
            sell_token,
            buy_token,
            slippage_bps,
        };
        match context.trading.price(&request).await {
            Ok(quote) => render_quote(PRICE_USAGE.name, "Pricing:", &quote),
            Err(error) => adapter_failure(PRICE_USAGE.name, "", &error),
        }
    }
}

static LIQUIDITY_USAGE: CommandUsage = CommandUsage {
    name: "ml",
    script: "/mL <chainId> <tokenA> <tokenB> <amountA> <amountB> <taker>",
    description: "Add liquidity to a pool",
    example: "/mL 8453 0x1234567890123456789012345678901234567890 0x1234567890123456789012345678901234567890 1000 1000 0x1234567890123456789012345678901234567890",
};

const LIQUIDITY_TEMPLATE: &str = "Liquidity added successfully\n\n\
--------\n\n\
Hash: {{ receipt.hash }}\n\n\
Pair Address: {{ receipt.pairAddress }}\n\n\
Dex: {{ receipt.dex }}";

/// `/mL`: adds liquidity to a Uniswap v2 pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct LiquidityCommand;

#[async_trait]
impl CommandHandler for LiquidityCommand {
    fn usage(&self) -> &'static CommandUsage {
        &LIQUIDITY_USAGE
    }

    fn arity(&self) -> Arity {
        Arity::Exact(6)
    }

    async fn run(&self, args: &[String], context: CommandContext<'_>) -> CommandResult {
        let Ok([chain_id, token_a, token_b, amount_a, amount_b, taker]) =
            <[String; 6]>::try_from(sanitized(args))
        else {
            return CommandResult::usage_failure(LIQUIDITY_USAGE.script);
        };
        let Ok(chain_id) = chain_id.parse::<u64>() else {
            return CommandResult::usage_failure(LIQUIDITY_USAGE.script);
        };

        let request = LiquidityRequest {
            chain_id,
            token_a,
            token_b,
            amount_a,
            amount_b,
            taker,
        };
        match context.trading.add_liquidity(&request).await {
            Ok(receipt) => render(
                LIQUIDITY_USAGE.name,
                LIQUIDITY_TEMPLATE,
                context! { receipt => receipt },
            ),
            Err(error) => adapter_failure(LIQUIDITY_USAGE.name, "", &error),
        }
    }
}
