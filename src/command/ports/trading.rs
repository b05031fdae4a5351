//! Trading backend port.
//!
//! Every operation is fallible for transport reasons regardless of payload
//! validity. Handlers convert [`AdapterError`] into a failed
//! [`CommandResult`](crate::command::domain::CommandResult) and never let
//! it propagate further.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use thiserror::Error;

/// Result type for trading adapter operations.
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Port for the external token, swap, and wallet workflow service.
#[async_trait]
pub trait TradingAdapter: Send + Sync {
    /// Deploys a new token.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] when the backend is unreachable or rejects the
    /// request.
    async fn create_token(&self, request: &CreateTokenRequest) -> AdapterResult<CreatedToken>;

    /// Deploys a token and lists it on a Uniswap v3 pool.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] when the backend is unreachable or rejects the
    /// request.
    async fn create_and_list_token(
        &self,
        request: &CreateAndListRequest,
    ) -> AdapterResult<ListedToken>;

    /// Swaps one token for another.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] when the backend is unreachable or rejects the
    /// request.
    async fn swap_tokens(&self, request: &SwapRequest) -> AdapterResult<SwapReceipt>;

    /// Lists tokens matching the query.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] when the backend is unreachable or rejects the
    /// request.
    async fn list_tokens(&self, query: &TokenQuery) -> AdapterResult<Vec<TokenInfo>>;

    /// Looks up one token by contract address.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] when the backend is unreachable or rejects the
    /// request.
    async fn token_detail(&self, address: &str) -> AdapterResult<Option<TokenInfo>>;

    /// Distributes tokens from one wallet to several recipients.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] when the backend is unreachable or rejects the
    /// request.
    async fn send_tokens(&self, request: &SendTokensRequest) -> AdapterResult<()>;

    /// Creates a fresh wallet.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] when the backend is unreachable or rejects the
    /// request.
    async fn create_wallet(&self) -> AdapterResult<Vec<WalletInfo>>;

    /// Stores market-maker settings.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] when the backend is unreachable or rejects the
    /// request.
    async fn save_market_maker_settings(
        &self,
        request: &MarketMakerSettingsRequest,
    ) -> AdapterResult<()>;

    /// Fetches stored market-maker settings by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] when the backend is unreachable or rejects the
    /// request.
    async fn market_maker_settings(
        &self,
        setting_id: &str,
    ) -> AdapterResult<Option<MarketMakerSettings>>;

    /// Adds liquidity to a Uniswap v2 pool.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] when the backend is unreachable or rejects the
    /// request.
    async fn add_liquidity(&self, request: &LiquidityRequest) -> AdapterResult<LiquidityReceipt>;

    /// Quotes a swap for a given sell amount.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] when the backend is unreachable or rejects the
    /// request.
    async fn quote(&self, request: &QuoteRequest) -> AdapterResult<PriceQuote>;

    /// Prices a token pair.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] when the backend is unreachable or rejects the
    /// request.
    async fn price(&self, request: &PriceRequest) -> AdapterResult<PriceQuote>;
}

/// Errors reported by trading adapters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdapterError {
    /// The request never produced a response.
    #[error("trading backend unreachable: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("trading backend returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// The response body could not be decoded.
    #[error("malformed trading backend payload: {0}")]
    Decode(String),

    /// The backend reported a failure inside a success response.
    #[error("trading backend rejected request: {0}")]
    Rejected(String),

    /// An argument cannot be used as a URL path segment.
    #[error("invalid path segment: {0:?}")]
    InvalidPath(String),
}

impl AdapterError {
    /// Creates a transport error from any displayable cause.
    #[must_use]
    pub fn transport(cause: impl std::fmt::Display) -> Self {
        Self::Transport(cause.to_string())
    }

    /// Creates a decode error from any displayable cause.
    #[must_use]
    pub fn decode(cause: impl std::fmt::Display) -> Self {
        Self::Decode(cause.to_string())
    }
}

/// Payload for `/mCreate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTokenRequest {
    /// Token name.
    pub name: String,
    /// Token ticker symbol.
    pub symbol: String,
    /// Total supply.
    pub total_supply: Number,
}

/// A freshly deployed token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedToken {
    /// Contract address.
    pub address: String,
    /// Deployment transaction hash.
    pub tx_hash: String,
}

/// Payload for `/mCreateV3`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAndListRequest {
    /// Token name.
    pub name: String,
    /// Token ticker symbol.
    pub symbol: String,
    /// Total supply.
    pub total_supply: Number,
    /// Address of the token paired in the pool.
    pub liq_token_address: String,
    /// Amount of the paired token supplied as liquidity.
    pub liq_token_amount: Number,
    /// Amount of the new token supplied as liquidity.
    pub initial_amount: Number,
}

/// A token deployed and listed in one workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListedToken {
    /// Listing transaction reference.
    pub transaction: String,
}

/// Payload for `/mSwap`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    /// Chain identifier.
    pub chain_id: u64,
    /// Token being sold.
    pub sell_token: String,
    /// Token being bought.
    pub buy_token: String,
    /// Amount being sold.
    pub sell_amount: Number,
    /// Slippage tolerance in basis points.
    pub slippage_bps: Number,
}

/// A completed swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapReceipt {
    /// Swap transaction hash.
    pub transaction_hash: String,
}

/// Query for `/mListTokens`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenQuery {
    /// Creator address filter.
    pub address: String,
    /// Token name filter.
    pub name: String,
    /// Token symbol filter.
    pub symbol: String,
}

/// Token record as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    /// Contract address.
    pub address: String,
    /// Token name.
    pub name: String,
    /// Token ticker symbol.
    pub symbol: String,
    /// Decimal places.
    pub decimals: u32,
    /// Total supply.
    pub total_supply: Number,
    /// Deployment transaction hash.
    pub created_hash: String,
    /// When the token was deployed.
    pub created_at: DateTime<Utc>,
}

/// Payload for `/mSendToken`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendTokensRequest {
    /// Token contract address.
    pub address: String,
    /// Amount sent to each wallet.
    pub amount: Number,
    /// Private key of the sending wallet.
    pub private_key: String,
    /// Recipient wallet addresses.
    pub wallets: Vec<String>,
}

/// A generated wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletInfo {
    /// Public address.
    pub address: String,
    /// Private key.
    pub private_key: String,
    /// Recovery phrase.
    pub mnemonic: String,
}

/// Kind of automated market-maker strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettingType {
    /// Automated buys.
    QuickBuy,
    /// Automated sells.
    QuickSell,
    /// Automated swaps.
    QuickSwap,
}

impl SettingType {
    /// Parses a user-supplied type, ignoring case and underscores.
    ///
    /// ```
    /// use memechat::command::ports::trading::SettingType;
    ///
    /// assert_eq!(SettingType::parse("Quick_Buy"), Some(SettingType::QuickBuy));
    /// assert_eq!(SettingType::parse("sell"), Some(SettingType::QuickSell));
    /// assert_eq!(SettingType::parse("hold"), None);
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.to_lowercase().replace('_', "");
        match normalized.as_str() {
            "quickbuy" | "buy" => Some(Self::QuickBuy),
            "quicksell" | "sell" => Some(Self::QuickSell),
            "quickswap" | "swap" => Some(Self::QuickSwap),
            _ => None,
        }
    }

    /// Returns the human-readable title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::QuickBuy => "Quick Buy",
            Self::QuickSell => "Quick Sell",
            Self::QuickSwap => "Quick Swap",
        }
    }
}

/// Amount bounds for one market-maker strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeBounds {
    /// Smallest trade amount.
    pub min_amount: Number,
    /// Largest trade amount.
    pub max_amount: Number,
    /// Per-trade slippage.
    pub slippage: Number,
}

/// Payload for `/mm`.
///
/// The bounds are serialized under the key matching `setting_type`
/// (`quickBuySetting`, `quickSellSetting`, or `quickSwapSetting`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketMakerSettingsRequest {
    /// Trading account identifier.
    pub account_id: String,
    /// First token of the pair.
    pub token0: String,
    /// Second token of the pair.
    pub token1: String,
    /// Strategy kind.
    pub setting_type: SettingType,
    /// Chain identifier.
    pub chain_id: u64,
    /// Trade bounds for the strategy.
    pub bounds: TradeBounds,
    /// Target price.
    pub target_price: Number,
    /// Minimum delay between trades.
    pub min_delay: Number,
    /// Maximum delay between trades.
    pub max_delay: Number,
}

impl MarketMakerSettingsRequest {
    /// Builds the JSON body expected by the backend.
    #[must_use]
    pub fn to_payload(&self) -> serde_json::Value {
        let bounds_key = match self.setting_type {
            SettingType::QuickBuy => "quickBuySetting",
            SettingType::QuickSell => "quickSellSetting",
            SettingType::QuickSwap => "quickSwapSetting",
        };
        let mut payload = serde_json::json!({
            "accountId": self.account_id,
            "token0": self.token0,
            "token1": self.token1,
            "type": self.setting_type,
            "chainId": self.chain_id,
            "targetPrice": self.target_price,
            "minDelay": self.min_delay,
            "maxDelay": self.max_delay,
        });
        if let Some(object) = payload.as_object_mut() {
            object.insert(
                bounds_key.to_owned(),
                serde_json::json!({
                    "minAmount": self.bounds.min_amount,
                    "maxAmount": self.bounds.max_amount,
                    "slippage": self.bounds.slippage,
                }),
            );
        }
        payload
    }
}

/// Stored market-maker settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketMakerSettings {
    /// Strategy kind.
    #[serde(rename = "type")]
    pub setting_type: SettingType,
    /// Trading account identifier.
    pub account_id: String,
    /// Chain identifier.
    pub chain_id: u64,
    /// Bounds for the quick-buy strategy.
    #[serde(default)]
    pub quick_buy_setting: Option<TradeBounds>,
    /// Bounds for the quick-sell strategy.
    #[serde(default)]
    pub quick_sell_setting: Option<TradeBounds>,
    /// Bounds for the quick-swap strategy.
    #[serde(default)]
    pub quick_swap_setting: Option<TradeBounds>,
    /// Global slippage.
    #[serde(default)]
    pub slippage: Option<Number>,
    /// First token of the pair.
    pub token0: String,
    /// Second token of the pair.
    pub token1: String,
    /// Target price.
    #[serde(default)]
    pub target_price: Option<Number>,
    /// Last observed price.
    #[serde(default)]
    pub current_price: Option<Number>,
    /// Target traded volume.
    #[serde(default)]
    pub target_volume: Option<Number>,
    /// Identifier of the running workflow.
    #[serde(default)]
    pub run_id: Option<String>,
    /// Workflow status.
    #[serde(default)]
    pub status: Option<String>,
    /// Minimum delay between trades.
    #[serde(default)]
    pub min_delay: Option<Number>,
    /// Maximum delay between trades.
    #[serde(default)]
    pub max_delay: Option<Number>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
    /// Wallets taking part in the strategy.
    #[serde(default)]
    pub wallets: Vec<String>,
}

impl MarketMakerSettings {
    /// Returns the bounds belonging to the stored strategy kind.
    #[must_use]
    pub const fn active_bounds(&self) -> Option<&TradeBounds> {
        match self.setting_type {
            SettingType::QuickBuy => self.quick_buy_setting.as_ref(),
            SettingType::QuickSell => self.quick_sell_setting.as_ref(),
            SettingType::QuickSwap => self.quick_swap_setting.as_ref(),
        }
    }
}

/// Payload for `/mL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityRequest {
    /// Chain identifier.
    pub chain_id: u64,
    /// First pool token.
    pub token_a: String,
    /// Second pool token.
    pub token_b: String,
    /// Amount of the first token.
    pub amount_a: String,
    /// Amount of the second token.
    pub amount_b: String,
    /// Address providing the liquidity.
    pub taker: String,
}

/// A completed liquidity deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityReceipt {
    /// Transaction hash.
    pub hash: String,
    /// Pool pair address.
    pub pair_address: String,
    /// Exchange the pool lives on.
    pub dex: String,
}

/// Query for `/mQuote`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    /// Chain identifier.
    pub chain_id: u64,
    /// Token being sold.
    pub sell_token: String,
    /// Token being bought.
    pub buy_token: String,
    /// Amount being sold.
    pub sell_amount: String,
    /// Slippage tolerance in basis points.
    pub slippage_bps: String,
}

/// Query for `/mprice`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRequest {
    /// Chain identifier.
    pub chain_id: u64,
    /// Token being sold.
    pub sell_token: String,
    /// Token being bought.
    pub buy_token: String,
    /// Slippage tolerance in basis points.
    pub slippage_bps: String,
}

/// Price or quote for a token pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    /// Token being sold.
    pub sell_token: String,
    /// Token being bought.
    pub buy_token: String,
    /// Amount being sold.
    #[serde(deserialize_with = "string_or_number")]
    pub sell_amount: String,
    /// Amount received.
    #[serde(deserialize_with = "string_or_number")]
    pub buy_amount: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}
