//! Trading adapter backed by the coin workflow HTTP service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::command::ports::trading::{
    AdapterError, AdapterResult, CreateAndListRequest, CreateTokenRequest, CreatedToken,
    LiquidityReceipt, LiquidityRequest, ListedToken, MarketMakerSettings,
    MarketMakerSettingsRequest, PriceQuote, PriceRequest, QuoteRequest, SendTokensRequest,
    SwapReceipt, SwapRequest, TokenInfo, TokenQuery, TradingAdapter, WalletInfo,
};

const API_KEY_HEADER: &str = "x-api-key";
const TOKEN_PAGE_SIZE: u32 = 1000;
const MAX_ERROR_BODY: usize = 512;

#[derive(Deserialize)]
struct TokenPage {
    #[serde(default)]
    tokens: Vec<TokenInfo>,
}

/// [`TradingAdapter`] speaking JSON over HTTP with an `x-api-key` header.
pub struct HttpTradingAdapter {
    client: Client,
    base_url: Url,
    api_key: SecretString,
}

impl HttpTradingAdapter {
    /// Creates an adapter for the service rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Transport`] when `base_url` is not a valid
    /// base URL or the HTTP client cannot be built.
    pub fn new(base_url: &str, api_key: SecretString, timeout: Duration) -> AdapterResult<Self> {
        let parsed = Url::parse(base_url).map_err(AdapterError::transport)?;
        if parsed.cannot_be_a_base() {
            return Err(AdapterError::transport(format!(
                "{parsed} cannot be used as a base URL"
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AdapterError::transport)?;
        Ok(Self {
            client,
            base_url: parsed,
            api_key,
        })
    }

    fn request(&self, method: Method, segments: &[&str]) -> AdapterResult<RequestBuilder> {
        let url = endpoint(&self.base_url, segments)?;
        Ok(self
            .client
            .request(method, url)
            .header(API_KEY_HEADER, self.api_key.expose_secret()))
    }

    /// Sends a request and returns the decoded JSON body, or `None` for 404.
    async fn dispatch(&self, request: RequestBuilder) -> AdapterResult<Option<Value>> {
        let response = request.send().await.map_err(AdapterError::transport)?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let text = response.text().await.map_err(AdapterError::transport)?;
        if !status.is_success() {
            return Err(AdapterError::Status {
                status: status.as_u16(),
                body: truncate(&text),
            });
        }
        if text.trim().is_empty() {
            return Ok(Some(Value::Null));
        }
        let body: Value = serde_json::from_str(&text).map_err(AdapterError::decode)?;
        reject_embedded_failure(&body)?;
        Ok(Some(body))
    }

    async fn fetch<R: DeserializeOwned>(&self, request: RequestBuilder) -> AdapterResult<R> {
        let body = self.dispatch(request).await?.ok_or(AdapterError::Status {
            status: StatusCode::NOT_FOUND.as_u16(),
            body: String::new(),
        })?;
        serde_json::from_value(body).map_err(AdapterError::decode)
    }

    async fn fetch_optional<R: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> AdapterResult<Option<R>> {
        match self.dispatch(request).await? {
            None | Some(Value::Null) => Ok(None),
            Some(body) => serde_json::from_value(body)
                .map(Some)
                .map_err(AdapterError::decode),
        }
    }
}

/// Appends `segments` to the base path. Each segment is percent-encoded,
/// `/` included, so user input cannot climb to another route.
fn endpoint(base: &Url, segments: &[&str]) -> AdapterResult<Url> {
    if let Some(bad) = segments
        .iter()
        .find(|segment| matches!(**segment, "" | "." | ".."))
    {
        return Err(AdapterError::InvalidPath((*bad).to_owned()));
    }
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| AdapterError::transport(format!("{base} cannot be used as a base URL")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// The service sometimes reports failures inside a 2xx body.
fn reject_embedded_failure(body: &Value) -> AdapterResult<()> {
    let code = body.get("statusCode").and_then(Value::as_u64);
    match code {
        Some(code) if code >= 500 => {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("backend reported an internal error");
            Err(AdapterError::Rejected(message.to_owned()))
        }
        _ => Ok(()),
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY).collect()
}

#[async_trait]
impl TradingAdapter for HttpTradingAdapter {
    async fn create_token(&self, request: &CreateTokenRequest) -> AdapterResult<CreatedToken> {
        self.fetch(self.request(Method::POST, &["api", "v1", "tokens"])?.json(request))
            .await
    }

    async fn create_and_list_token(
        &self,
        request: &CreateAndListRequest,
    ) -> AdapterResult<ListedToken> {
        self.fetch(
            self.request(Method::POST, &["api", "v1", "workflows", "create-and-list"])?
                .json(request),
        )
        .await
    }

    async fn swap_tokens(&self, request: &SwapRequest) -> AdapterResult<SwapReceipt> {
        self.fetch(self.request(Method::POST, &["api", "v1", "workflows", "swap"])?.json(request))
            .await
    }

    async fn list_tokens(&self, query: &TokenQuery) -> AdapterResult<Vec<TokenInfo>> {
        let request = self
            .request(Method::GET, &["api", "v1", "tokens"])?
            .query(&[("page", 1), ("size", TOKEN_PAGE_SIZE)])
            .query(query);
        let page: Option<TokenPage> = self.fetch_optional(request).await?;
        Ok(page.map(|found| found.tokens).unwrap_or_default())
    }

    async fn token_detail(&self, address: &str) -> AdapterResult<Option<TokenInfo>> {
        self.fetch_optional(self.request(Method::GET, &["api", "v1", "tokens", address])?)
            .await
    }

    async fn send_tokens(&self, request: &SendTokensRequest) -> AdapterResult<()> {
        self.dispatch(self.request(Method::POST, &["api", "v1", "tokens", "send"])?.json(request))
            .await?
            .map(|_| ())
            .ok_or(AdapterError::Status {
                status: StatusCode::NOT_FOUND.as_u16(),
                body: String::new(),
            })
    }

    async fn create_wallet(&self) -> AdapterResult<Vec<WalletInfo>> {
        self.fetch(self.request(Method::POST, &["api", "v1", "wallets"])?)
            .await
    }

    async fn save_market_maker_settings(
        &self,
        request: &MarketMakerSettingsRequest,
    ) -> AdapterResult<()> {
        self.fetch::<Value>(
            self.request(Method::POST, &["api", "v1", "mm-settings"])?
                .json(&request.to_payload()),
        )
        .await
        .map(|_| ())
    }

    async fn market_maker_settings(
        &self,
        setting_id: &str,
    ) -> AdapterResult<Option<MarketMakerSettings>> {
        self.fetch_optional(
            self.request(Method::GET, &["api", "v1", "mm-settings", setting_id])?,
        )
        .await
    }

    async fn add_liquidity(&self, request: &LiquidityRequest) -> AdapterResult<LiquidityReceipt> {
        self.fetch(
            self.request(Method::POST, &["api", "v1", "workflows", "uni-v2", "liquidity"])?
                .json(request),
        )
        .await
    }

    async fn quote(&self, request: &QuoteRequest) -> AdapterResult<PriceQuote> {
        self.fetch(
            self.request(Method::GET, &["api", "v1", "workflows", "quote"])?
                .query(request),
        )
        .await
    }

    async fn price(&self, request: &PriceRequest) -> AdapterResult<PriceQuote> {
        self.fetch(
            self.request(Method::GET, &["api", "v1", "workflows", "price"])?
                .query(request),
        )
        .await
    }
}

impl std::fmt::Debug for HttpTradingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTradingAdapter")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
