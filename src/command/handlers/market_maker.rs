//! Market-maker settings commands.

use async_trait::async_trait;
use minijinja::context;
use serde::Serialize;
use serde_json::Number;

use super::{
    CommandContext, CommandHandler, DATE_FORMAT, adapter_failure, number_or, parse_number, render,
    sanitized,
};
use crate::command::domain::{Arity, CommandResult, CommandUsage};
use crate::command::ports::trading::{
    MarketMakerSettings, MarketMakerSettingsRequest, SettingType, TradeBounds,
};

/// Target price used when `<targetPrice>` is unparsable or zero.
pub const DEFAULT_TARGET_PRICE: u64 = 5;
/// Minimum delay used when `<minDelay>` is unparsable or zero.
pub const DEFAULT_MIN_DELAY: u64 = 10;
/// Maximum delay used when `<maxDelay>` is unparsable or zero.
pub const DEFAULT_MAX_DELAY: u64 = 50;

static SET_USAGE: CommandUsage = CommandUsage {
    name: "mm",
    script: "/mm <accountId> <slippage> <token0> <token1> <type> <chainId> <minAmount> <maxAmount> <targetPrice> <minDelay> <maxDelay>",
    description: "Meme coin setting",
    example: "/mm acc-1 1 0xA 0xB buy 8453 10 100 5 10 50",
};

/// `/mm`: stores market-maker settings.
///
/// `<targetPrice>`, `<minDelay>` and `<maxDelay>` are lenient: unparsable or
/// zero values fall back to [`DEFAULT_TARGET_PRICE`], [`DEFAULT_MIN_DELAY`]
/// and [`DEFAULT_MAX_DELAY`].
#[derive(Debug, Default, Clone, Copy)]
pub struct MarketMakerCommand;

#[async_trait]
impl CommandHandler for MarketMakerCommand {
    fn usage(&self) -> &'static CommandUsage {
        &SET_USAGE
    }

    fn arity(&self) -> Arity {
        Arity::Exact(11)
    }

    async fn run(&self, args: &[String], context: CommandContext<'_>) -> CommandResult {
        let Ok(
            [
                account_id,
                slippage,
                token0,
                token1,
                setting_type,
                chain_id,
                min_amount,
                max_amount,
                target_price,
                min_delay,
                max_delay,
            ],
        ) = <[String; 11]>::try_from(sanitized(args))
        else {
            return CommandResult::usage_failure(SET_USAGE.script);
        };

        let Some(setting_type) = SettingType::parse(&setting_type) else {
            return CommandResult::failure(
                "Meme coin setting failed: Invalid setting type. Available type: Buy, Sell, Swap",
            );
        };
        let (Ok(chain_id), Some(slippage), Some(min_amount), Some(max_amount)) = (
            chain_id.parse::<u64>(),
            parse_number(&slippage),
            parse_number(&min_amount),
            parse_number(&max_amount),
        ) else {
            return CommandResult::usage_failure(SET_USAGE.script);
        };

        let request = MarketMakerSettingsRequest {
            account_id,
            token0,
            token1,
            setting_type,
            chain_id,
            bounds: TradeBounds {
                min_amount,
                max_amount,
                slippage,
            },
            target_price: number_or(&target_price, DEFAULT_TARGET_PRICE),
            min_delay: number_or(&min_delay, DEFAULT_MIN_DELAY),
            max_delay: number_or(&max_delay, DEFAULT_MAX_DELAY),
        };
        match context.trading.save_market_maker_settings(&request).await {
            Ok(()) => CommandResult::success("Setting updated"),
            Err(error) => adapter_failure(SET_USAGE.name, "Meme coin setting failed: ", &error),
        }
    }
}

static GET_USAGE: CommandUsage = CommandUsage {
    name: "mgs",
    script: "/mGS <settingId>",
    description: "Get meme coin setting",
    example: "/mGS 112233",
};

const GET_TEMPLATE: &str = "Meme coin settings:\n\n\
-----------\n\n\
Type: {{ s.kind }}\n\n\
Account ID: {{ s.account_id }}\n\n\
Chain ID: {{ s.chain_id }}\n\n\
Min Amount: {{ s.min_amount }}\n\n\
Max Amount: {{ s.max_amount }}\n\n\
Quick Slippage: {{ s.quick_slippage }}\n\n\
Slippage: {{ s.slippage }}\n\n\
Token 0: {{ s.token0 }}\n\n\
Token 1: {{ s.token1 }}\n\n\
Target Price: {{ s.target_price }}\n\n\
Current Price: {{ s.current_price }}\n\n\
Target Volume: {{ s.target_volume }}\n\n\
Run ID: {{ s.run_id }}\n\n\
Status: {{ s.status }}\n\n\
Min Delay: {{ s.min_delay }}\n\n\
Max Delay: {{ s.max_delay }}\n\n\
Issue Date: {{ s.created }}\n\n\
Last updated date: {{ s.updated }}\n\n\
Wallets:\n\n\
{% for wallet in s.wallets %}• {{ wallet }}\n\n{% endfor %}";

const MISSING: &str = "-";

#[derive(Serialize)]
struct SettingsView<'a> {
    kind: &'static str,
    account_id: &'a str,
    chain_id: u64,
    min_amount: String,
    max_amount: String,
    quick_slippage: String,
    slippage: String,
    token0: &'a str,
    token1: &'a str,
    target_price: String,
    current_price: String,
    target_volume: String,
    run_id: &'a str,
    status: &'a str,
    min_delay: String,
    max_delay: String,
    created: String,
    updated: String,
    wallets: &'a [String],
}

fn shown(number: Option<&Number>) -> String {
    number.map_or_else(|| MISSING.to_owned(), ToString::to_string)
}

impl<'a> From<&'a MarketMakerSettings> for SettingsView<'a> {
    fn from(settings: &'a MarketMakerSettings) -> Self {
        let bounds = settings.active_bounds();
        Self {
            kind: settings.setting_type.title(),
            account_id: &settings.account_id,
            chain_id: settings.chain_id,
            min_amount: shown(bounds.map(|b| &b.min_amount)),
            max_amount: shown(bounds.map(|b| &b.max_amount)),
            quick_slippage: shown(bounds.map(|b| &b.slippage)),
            slippage: shown(settings.slippage.as_ref()),
            token0: &settings.token0,
            token1: &settings.token1,
            target_price: shown(settings.target_price.as_ref()),
            current_price: shown(settings.current_price.as_ref()),
            target_volume: shown(settings.target_volume.as_ref()),
            run_id: settings.run_id.as_deref().unwrap_or(MISSING),
            status: settings.status.as_deref().unwrap_or(MISSING),
            min_delay: shown(settings.min_delay.as_ref()),
            max_delay: shown(settings.max_delay.as_ref()),
            created: settings.created_at.format(DATE_FORMAT).to_string(),
            updated: settings.updated_at.format(DATE_FORMAT).to_string(),
            wallets: &settings.wallets,
        }
    }
}

/// `/mGS <settingId>`: shows stored market-maker settings.
#[derive(Debug, Default, Clone, Copy)]
pub struct GetSettingsCommand;

#[async_trait]
impl CommandHandler for GetSettingsCommand {
    fn usage(&self) -> &'static CommandUsage {
        &GET_USAGE
    }

    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    async fn run(&self, args: &[String], context: CommandContext<'_>) -> CommandResult {
        let Ok([setting_id]) = <[String; 1]>::try_from(sanitized(args)) else {
            return CommandResult::usage_failure(GET_USAGE.script);
        };

        match context.trading.market_maker_settings(&setting_id).await {
            Ok(Some(settings)) => render(
                GET_USAGE.name,
                GET_TEMPLATE,
                context! { s => SettingsView::from(&settings) },
            ),
            Ok(None) => CommandResult::backend_failure(""),
            Err(error) => adapter_failure(GET_USAGE.name, "", &error),
        }
    }
}
